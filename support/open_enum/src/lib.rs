// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![no_std]

//! Provides the [`open_enum`] macro.

/// Declares an "open" enum: a `#[repr(transparent)]` newtype over a wire
/// integer, with the known values as associated constants.
///
/// Unlike a real Rust `enum`, any value of the storage type is representable,
/// so reading an unrecognized discriminant out of a firmware image is not
/// undefined behavior - it simply fails to match any of the named constants.
/// This is the right shape for on-disk and on-wire discriminants, where the
/// full value space is owned by a spec rather than by this crate.
///
/// The generated type derives `Copy`, `Clone`, `Eq`, `PartialEq`, `Hash`,
/// `Ord`, and `PartialOrd`, and gets a `Debug` impl that prints the constant
/// name when the value is known and the raw integer otherwise.
///
/// # Example
///
/// ```
/// use open_enum::open_enum;
/// open_enum! {
///     /// On-disk state of a variable store header.
///     pub enum VarStoreState: u8 {
///         HEALTHY = 0xfe,
///     }
/// }
///
/// assert_eq!(VarStoreState::HEALTHY.0, 0xfe);
/// assert_eq!(format!("{:?}", VarStoreState::HEALTHY), "HEALTHY");
/// assert_eq!(format!("{:?}", VarStoreState(0x7f)), "127");
/// ```
#[macro_export]
macro_rules! open_enum {
    (
        $(#[$a:meta])*
        $v:vis enum $name:ident : $storage:ty {
            $(#![$implattr:meta])*
            $(
                $(#[$vattr:meta])*
                $variant:ident = $value:expr,
            )*
        }
    ) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        $(#[$a])*
        $v struct $name(pub $storage);
        $(#[$implattr])*
        impl $name {
            $(
                $(#[$vattr])*
                pub const $variant: $name = $name($value);
            )*
        }
        impl ::core::fmt::Debug for $name {
            fn fmt(&self, fmt: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                #![allow(unreachable_patterns)]
                let s = match *self {
                    $( Self::$variant => stringify!($variant), )*
                    _ => {
                        return ::core::fmt::Debug::fmt(&self.0, fmt);
                    }
                };
                fmt.pad(s)
            }
        }
    }
}
