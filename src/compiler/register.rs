//! # Register Allocator
//!
//! Manages a fixed-size pool of VM registers with lifetimes tied to AST nodes.
//! Registers are drawn from a free-list; a leaked register (one
//! never released before the owning method's `RET`) is a compiler bug, not a
//! user error, and is caught with an assertion rather than a [`CompileError`].

use crate::compiler::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegId(pub u8);

/// The VM's register bank has at least 32 slots; this
/// is the default used when a [`crate::compiler::CompileOptions`] does not
/// override it.
pub const DEFAULT_BANK_SIZE: u8 = 32;

#[derive(Debug)]
struct Slot {
    free: bool,
    /// A human-readable hint recorded purely for emitted assembly comments.
    hint: Option<String>,
}

/// A scoped, free-list register bank.
#[derive(Debug)]
pub struct RegisterAllocator {
    slots: Vec<Slot>,
}

impl RegisterAllocator {
    pub fn new(bank_size: u8) -> Self {
        let slots = (0..bank_size)
            .map(|_| Slot { free: true, hint: None })
            .collect();
        Self { slots }
    }

    /// Acquires the lowest-numbered free register, recording `hint` for
    /// debugging. Exhaustion is a fatal compile error.
    pub fn alloc(&mut self, hint: &str, line: usize) -> Result<RegId, CompileError> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.free {
                slot.free = false;
                slot.hint = Some(hint.to_string());
                return Ok(RegId(i as u8));
            }
        }
        Err(CompileError::register_pressure_exceeded(line))
    }

    pub fn dealloc(&mut self, reg: RegId) {
        let slot = &mut self.slots[reg.0 as usize];
        slot.free = true;
        slot.hint = None;
    }

    pub fn hint(&self, reg: RegId) -> Option<&str> {
        self.slots[reg.0 as usize].hint.as_deref()
    }

    /// Runs `body`, passing it a freshly allocated register, and releases
    /// that register when `body` returns — a scoped alternative to manual
    /// `alloc`/`dealloc` pairs.
    pub fn with<T>(
        &mut self,
        hint: &str,
        line: usize,
        body: impl FnOnce(&mut Self, RegId) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        let reg = self.alloc(hint, line)?;
        let result = body(self, reg);
        self.dealloc(reg);
        result
    }

    /// True once every register has been returned to the free list. Asserted
    /// at method exit ("the allocator asserts no leaks").
    pub fn all_free(&self) -> bool {
        self.slots.iter().all(|s| s.free)
    }

    /// Indices of any register still marked in-use; used to build a useful
    /// panic message when [`Self::all_free`] is false at method exit.
    pub fn leaked(&self) -> Vec<u8> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.free)
            .map(|(i, _)| i as u8)
            .collect()
    }
}
