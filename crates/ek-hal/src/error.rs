// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! HAL error types

use core::fmt;

/// HAL error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Key ladder raised its error flag
    LadderError,
    /// Key ladder did not complete in time
    LadderTimeout,
    /// Flash word read failed
    FlashReadFailed,
    /// Another flash window is read-enabled
    FlashWindowBusy,
    /// Flash window is not read-enabled
    FlashWindowClosed,
    /// Flash offset outside the enabled window
    FlashOutOfBounds,
    /// Platform authorization is not established
    NvAuthFailed,
    /// NV index already defined
    NvSpaceDefined,
    /// NV index not defined
    NvSpaceUndefined,
    /// NV space is write locked
    NvWriteLocked,
    /// NV write beyond the space size
    NvOutOfBounds,
    /// NV storage has no room for another space
    NvNoSpace,
    /// NV engine failed the operation
    NvFailure,
    /// NV commit failed
    NvCommitFailed,
    /// Invalid parameter
    InvalidParameter,
    /// Hardware fault detected
    HardwareFault,
}

impl HalError {
    /// Get error code
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::LadderError => 0x0810,
            Self::LadderTimeout => 0x0811,
            Self::FlashReadFailed => 0x0820,
            Self::FlashWindowBusy => 0x0821,
            Self::FlashWindowClosed => 0x0822,
            Self::FlashOutOfBounds => 0x0823,
            Self::NvAuthFailed => 0x0830,
            Self::NvSpaceDefined => 0x0831,
            Self::NvSpaceUndefined => 0x0832,
            Self::NvWriteLocked => 0x0833,
            Self::NvOutOfBounds => 0x0834,
            Self::NvNoSpace => 0x0835,
            Self::NvFailure => 0x0836,
            Self::NvCommitFailed => 0x0837,
            Self::InvalidParameter => 0x08F0,
            Self::HardwareFault => 0x08D0,
        }
    }

    /// Get error description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::LadderError => "key ladder error flag set",
            Self::LadderTimeout => "key ladder timeout",
            Self::FlashReadFailed => "flash read failed",
            Self::FlashWindowBusy => "flash window busy",
            Self::FlashWindowClosed => "flash window not enabled",
            Self::FlashOutOfBounds => "flash offset out of bounds",
            Self::NvAuthFailed => "platform authorization missing",
            Self::NvSpaceDefined => "NV index already defined",
            Self::NvSpaceUndefined => "NV index not defined",
            Self::NvWriteLocked => "NV index write locked",
            Self::NvOutOfBounds => "NV write out of bounds",
            Self::NvNoSpace => "NV storage full",
            Self::NvFailure => "NV operation failed",
            Self::NvCommitFailed => "NV commit failed",
            Self::InvalidParameter => "invalid parameter",
            Self::HardwareFault => "hardware fault detected",
        }
    }
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}

impl From<HalError> for ek_common::Error {
    fn from(e: HalError) -> Self {
        match e {
            HalError::LadderError => Self::LadderStepFailed,
            HalError::LadderTimeout => Self::LadderTimeout,
            HalError::FlashReadFailed
            | HalError::FlashOutOfBounds
            | HalError::FlashWindowClosed => Self::FlashReadFailed,
            HalError::FlashWindowBusy => Self::FlashWindowBusy,
            HalError::NvAuthFailed => Self::NvStartupFailed,
            HalError::NvSpaceDefined => Self::NvSpaceAlreadyDefined,
            HalError::NvSpaceUndefined
            | HalError::NvWriteLocked
            | HalError::NvOutOfBounds => Self::NvWriteFailed,
            HalError::NvNoSpace | HalError::NvFailure => Self::NvDefineFailed,
            HalError::NvCommitFailed => Self::NvCommitFailed,
            HalError::InvalidParameter => Self::InvalidParameter,
            HalError::HardwareFault => Self::InternalError,
        }
    }
}

/// HAL Result type
pub type HalResult<T> = Result<T, HalError>;
