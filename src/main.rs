//! # TombLang Compiler (tombc) Executable
//!
//! CLI driver around the `tombc` library: a `compile` subcommand that writes
//! bytecode/ABI artifacts (or, with `--show-asm`, prints structured assembly
//! text) plus a `test` subcommand that compiles every `.tomb` file under a
//! directory and reports pass/fail. Deliberately thin — all real logic lives
//! in the library.

use clap::{Parser as ClapParser, Subcommand};
use std::path::PathBuf;
use std::process;
use tombc::codegen::asm;
use tombc::compiler::CompileOptions;
use tombc::Compiler;

#[derive(ClapParser)]
#[command(name = "tombc", version, about = "TombLang compiler front-end and code generator")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compile a single `.tomb` source file.
    Compile {
        file: PathBuf,
        /// Directory artifacts (`<module>.tombc`, `<module>.abi.bin`) are written to.
        #[arg(long, default_value = "./build")]
        out: PathBuf,
        /// Print the structured assembly text instead of writing binary artifacts.
        #[arg(long)]
        show_asm: bool,
        /// Omit `// Line N: <source>` annotations from `--show-asm` output.
        #[arg(long)]
        no_line_comments: bool,
    },
    /// Compile every `.tomb` file in a directory and report pass/fail.
    Test { dir: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Cmd::Compile { file, out, show_asm, no_line_comments } => {
            run_compile(&file, &out, show_asm, no_line_comments);
        }
        Cmd::Test { dir } => run_test(&dir),
    }
}

fn run_compile(file: &PathBuf, out: &PathBuf, show_asm: bool, no_line_comments: bool) {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("could not read {:?}: {}", file, e);
            process::exit(1);
        }
    };

    let options = CompileOptions { emit_line_comments: !no_line_comments, ..CompileOptions::default() };

    if show_asm {
        match Compiler::generate_artifacts(&source, options.clone()) {
            Ok(artifacts) => {
                for module in &artifacts {
                    print_artifact(module, options.emit_line_comments);
                }
            }
            Err(e) => {
                eprintln!("compile error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match Compiler::compile_with_options(&source, options) {
        Ok(modules) => {
            if let Err(e) = std::fs::create_dir_all(out) {
                eprintln!("could not create {:?}: {}", out, e);
                process::exit(1);
            }
            for module in &modules {
                if let Err(e) = write_module(module, out) {
                    eprintln!("could not write artifacts for '{}': {}", module.name, e);
                    process::exit(1);
                }
            }
            println!("compiled {} module(s) into {:?}", modules.len(), out);
        }
        Err(e) => {
            eprintln!("compile error: {}", e);
            process::exit(1);
        }
    }
}

fn print_artifact(module: &tombc::codegen::module_generator::ModuleArtifact, emit_line_comments: bool) {
    println!("; module {}", module.name);
    print!("{}", asm::render(&module.asm, emit_line_comments));
    for sub in &module.sub_modules {
        print_artifact(sub, emit_line_comments);
    }
}

fn write_module(module: &tombc::CompiledModule, out: &PathBuf) -> std::io::Result<()> {
    std::fs::write(out.join(format!("{}.tombc", module.name)), &module.script)?;
    std::fs::write(out.join(format!("{}.abi.bin", module.name)), &module.abi)?;
    for sub in &module.sub_modules {
        write_module(sub, out)?;
    }
    Ok(())
}

fn run_test(dir: &PathBuf) {
    let results = match Compiler::compile_many(dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("could not read {:?}: {}", dir, e);
            process::exit(1);
        }
    };

    println!("testing {} file(s)", results.len());
    let mut all_passed = true;
    for (path, result) in &results {
        print!("{:?}... ", path);
        match result {
            Ok(modules) => println!("PASSED ({} module(s))", modules.len()),
            Err(e) => {
                println!("FAILED: {}", e);
                all_passed = false;
            }
        }
    }

    if all_passed {
        println!("all tests passed");
    } else {
        process::exit(1);
    }
}
