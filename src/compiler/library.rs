//! # Library Registry
//!
//! Catalogs the standard library (Runtime, Math, Map, List, Array, Crypto,
//! NFT, Time, Call, String, Struct): their methods, parameter/return types,
//! and lowering strategy.
//!
//! The "custom" strategy is modeled as a named strategy selected by an enum
//! rather than a callback trait, since every custom case in this registry
//! (`Call.method<T>`, `Call.interop<T>`) needs the same pre/post shape: push
//! a dynamic name, push coerced arguments, ext-call, coerce the result.

use crate::compiler::error::CompileError;

/// How a library method call lowers to VM assembly.
#[derive(Debug, Clone)]
pub enum LoweringStrategy {
    /// `LOAD r "<qualified.name>"; EXTCALL r` — a VM intrinsic by name.
    ExtCall { qualified_name: String },
    /// `LOAD r "methodName"; PUSH r; LOAD r "contractName"; CTX r r; SWITCH r`.
    ContractCall,
    /// `CALL @entry_<name>` — a method defined in the current module.
    LocalCall,
    /// A canned snippet emitted at most once per script, appended to the
    /// builtin section the first time it is used.
    BuiltinInline { snippet: &'static str },
    /// `Call.method<T>(name, args...)` / `Call.interop<T>("Name", args...)` —
    /// dynamic name, typed result coercion.
    CustomCall { interop: bool },
    /// Declared in the registry but without a working lowering — reaching
    /// this at code generation raises the "not implemented" diagnostic.
    Unimplemented,
}

/// One method signature of a built-in library.
#[derive(Debug, Clone)]
pub struct LibraryMethod {
    pub name: &'static str,
    /// Declared parameter type names, for arity/shape checking by the analyzer.
    pub params: &'static [&'static str],
    pub return_type: Option<&'static str>,
    pub strategy: LoweringStrategy,
}

/// One built-in library: a name plus its method table.
#[derive(Debug, Clone)]
pub struct Library {
    pub name: &'static str,
    pub methods: Vec<LibraryMethod>,
}

/// The full set of libraries a TombLang module may `import`.
#[derive(Debug, Default)]
pub struct LibraryRegistry {
    libraries: Vec<Library>,
}

impl LibraryRegistry {
    /// Builds the registry with the standard library set.
    pub fn standard() -> Self {
        let mut reg = Self { libraries: Vec::new() };
        reg.libraries.push(runtime_library());
        reg.libraries.push(math_library());
        reg.libraries.push(map_library());
        reg.libraries.push(list_library());
        reg.libraries.push(array_library());
        reg.libraries.push(crypto_library());
        reg.libraries.push(nft_library());
        reg.libraries.push(time_library());
        reg.libraries.push(call_library());
        reg.libraries.push(string_library());
        reg.libraries.push(struct_library());
        reg
    }

    pub fn find(&self, library: &str) -> Option<&Library> {
        self.libraries.iter().find(|l| l.name == library)
    }

    pub fn find_method(&self, library: &str, method: &str) -> Option<&LibraryMethod> {
        self.find(library).and_then(|l| l.methods.iter().find(|m| m.name == method))
    }

    /// Raises the "not implemented" error for a custom method lacking
    /// working lowering callbacks.
    pub fn check_implemented(library: &str, method: &LibraryMethod, line: usize) -> Result<(), CompileError> {
        if matches!(method.strategy, LoweringStrategy::Unimplemented) {
            Err(CompileError::library_not_implemented(line, library, method.name))
        } else {
            Ok(())
        }
    }
}

fn runtime_library() -> Library {
    Library {
        name: "Runtime",
        methods: vec![
            LibraryMethod { name: "revert", params: &["string"], return_type: None, strategy: LoweringStrategy::ExtCall { qualified_name: "Runtime.revert".into() } },
            LibraryMethod { name: "sender", params: &[], return_type: Some("address"), strategy: LoweringStrategy::ExtCall { qualified_name: "Runtime.sender".into() } },
            LibraryMethod { name: "notify", params: &["string", "any"], return_type: None, strategy: LoweringStrategy::ExtCall { qualified_name: "Runtime.notify".into() } },
            // Backs the `$THIS_ADDRESS`/`$THIS_SYMBOL` macros — the
            // running module's own address/symbol is a VM context value, not a
            // compile-time constant, so the macros lower through here.
            LibraryMethod { name: "selfAddress", params: &[], return_type: Some("address"), strategy: LoweringStrategy::ExtCall { qualified_name: "Runtime.selfAddress".into() } },
            LibraryMethod { name: "selfSymbol", params: &[], return_type: Some("string"), strategy: LoweringStrategy::ExtCall { qualified_name: "Runtime.selfSymbol".into() } },
        ],
    }
}

fn math_library() -> Library {
    Library {
        name: "Math",
        methods: vec![
            LibraryMethod { name: "min", params: &["number", "number"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "Math.min".into() } },
            LibraryMethod { name: "max", params: &["number", "number"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "Math.max".into() } },
            LibraryMethod { name: "abs", params: &["number"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "Math.abs".into() } },
            LibraryMethod { name: "pow", params: &["number", "number"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "Math.pow".into() } },
        ],
    }
}

fn map_library() -> Library {
    Library {
        name: "Map",
        methods: vec![
            LibraryMethod { name: "get", params: &["map", "any"], return_type: Some("any"), strategy: LoweringStrategy::ExtCall { qualified_name: "Map.get".into() } },
            LibraryMethod { name: "set", params: &["map", "any", "any"], return_type: None, strategy: LoweringStrategy::ExtCall { qualified_name: "Map.set".into() } },
            LibraryMethod { name: "has", params: &["map", "any"], return_type: Some("bool"), strategy: LoweringStrategy::ExtCall { qualified_name: "Map.has".into() } },
            LibraryMethod { name: "remove", params: &["map", "any"], return_type: None, strategy: LoweringStrategy::ExtCall { qualified_name: "Map.remove".into() } },
        ],
    }
}

fn list_library() -> Library {
    Library {
        name: "List",
        methods: vec![
            LibraryMethod { name: "push", params: &["list", "any"], return_type: None, strategy: LoweringStrategy::ExtCall { qualified_name: "List.push".into() } },
            LibraryMethod { name: "pop", params: &["list"], return_type: Some("any"), strategy: LoweringStrategy::ExtCall { qualified_name: "List.pop".into() } },
            LibraryMethod { name: "length", params: &["list"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "List.length".into() } },
        ],
    }
}

fn array_library() -> Library {
    Library {
        name: "Array",
        methods: vec![
            LibraryMethod { name: "length", params: &["array"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "Array.length".into() } },
            LibraryMethod { name: "slice", params: &["array", "number", "number"], return_type: Some("array"), strategy: LoweringStrategy::ExtCall { qualified_name: "Array.slice".into() } },
            LibraryMethod { name: "join", params: &["array", "string"], return_type: Some("string"), strategy: LoweringStrategy::BuiltinInline { snippet: "array_join" } },
        ],
    }
}

fn crypto_library() -> Library {
    Library {
        name: "Crypto",
        methods: vec![
            LibraryMethod { name: "hash", params: &["bytes"], return_type: Some("hash"), strategy: LoweringStrategy::ExtCall { qualified_name: "Crypto.hash".into() } },
            LibraryMethod { name: "verifySignature", params: &["bytes", "bytes", "address"], return_type: Some("bool"), strategy: LoweringStrategy::ExtCall { qualified_name: "Crypto.verifySignature".into() } },
            // Catalogued ahead of the VM intrinsic that would back it; calling
            // it raises the "not implemented" diagnostic until a real
            // lowering callback exists.
            LibraryMethod { name: "recoverSigner", params: &["hash", "bytes"], return_type: Some("address"), strategy: LoweringStrategy::Unimplemented },
        ],
    }
}

fn nft_library() -> Library {
    Library {
        name: "NFT",
        methods: vec![
            LibraryMethod { name: "mint", params: &["address", "number"], return_type: Some("number"), strategy: LoweringStrategy::ContractCall },
            LibraryMethod { name: "burn", params: &["number"], return_type: None, strategy: LoweringStrategy::ContractCall },
            LibraryMethod { name: "ownerOf", params: &["number"], return_type: Some("address"), strategy: LoweringStrategy::ContractCall },
        ],
    }
}

fn time_library() -> Library {
    Library {
        name: "Time",
        methods: vec![
            LibraryMethod { name: "now", params: &[], return_type: Some("timestamp"), strategy: LoweringStrategy::ExtCall { qualified_name: "Time.now".into() } },
        ],
    }
}

fn call_library() -> Library {
    Library {
        name: "Call",
        methods: vec![
            LibraryMethod { name: "method", params: &["string"], return_type: Some("any"), strategy: LoweringStrategy::CustomCall { interop: false } },
            LibraryMethod { name: "interop", params: &["string"], return_type: Some("any"), strategy: LoweringStrategy::CustomCall { interop: true } },
        ],
    }
}

fn string_library() -> Library {
    Library {
        name: "String",
        methods: vec![
            LibraryMethod { name: "length", params: &["string"], return_type: Some("number"), strategy: LoweringStrategy::ExtCall { qualified_name: "String.length".into() } },
            LibraryMethod { name: "concat", params: &["string", "string"], return_type: Some("string"), strategy: LoweringStrategy::ExtCall { qualified_name: "String.concat".into() } },
            LibraryMethod { name: "substring", params: &["string", "number", "number"], return_type: Some("string"), strategy: LoweringStrategy::ExtCall { qualified_name: "String.substring".into() } },
        ],
    }
}

fn struct_library() -> Library {
    Library {
        name: "Struct",
        // `Struct.NAME(f1, f2, ...)` is synthesized per struct declaration by
        // the analyzer, not catalogued statically here.
        methods: Vec::new(),
    }
}
