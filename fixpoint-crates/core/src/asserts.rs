//! Leveled assertions. The level is raised under `cfg(test)` and with the `debug-checks` feature,
//! which enables the more expensive consistency checks of the engine.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const FIXPOINT_ASSERT_LEVEL_DEFINITION: u8 = FIXPOINT_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const FIXPOINT_ASSERT_LEVEL_DEFINITION: u8 = FIXPOINT_ASSERT_ADVANCED;

pub const FIXPOINT_ASSERT_SIMPLE: u8 = 1;
pub const FIXPOINT_ASSERT_MODERATE: u8 = 2;
pub const FIXPOINT_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! fixpoint_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::FIXPOINT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::FIXPOINT_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! fixpoint_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::FIXPOINT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::FIXPOINT_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! fixpoint_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::FIXPOINT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::FIXPOINT_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! fixpoint_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::FIXPOINT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::FIXPOINT_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
