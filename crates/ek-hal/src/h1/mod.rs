// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! H1 Hardware Abstraction Layer
//!
//! Memory-mapped drivers for the H1 security chip:
//!
//! - KEYMGR hardware key ladder
//! - GLOBALSEC flash region protection windows
//!
//! Register addresses come from the board through layout structs, so the
//! drivers carry no chip-revision constants of their own.

pub mod keymgr;
pub mod globalsec;

pub use keymgr::{H1KeyLadder, KeymgrRegisters};
pub use globalsec::{GlobalsecRegisters, H1FlashLayout, H1FlashWindows};

use core::ptr::{read_volatile, write_volatile};

/// Volatile 32-bit register read
///
/// # Safety
///
/// `addr` must be a valid, aligned, readable 32-bit location.
#[inline]
unsafe fn read_reg(addr: usize) -> u32 {
    read_volatile(addr as *const u32)
}

/// Volatile 32-bit register write
///
/// # Safety
///
/// `addr` must be a valid, aligned, writable 32-bit location.
#[inline]
unsafe fn write_reg(addr: usize, value: u32) {
    write_volatile(addr as *mut u32, value);
}
