//! Logging shims.
//!
//! The session logs through whichever backend the `defmt`, `log` or `esp32-log` feature selects.
//! Without any of them the arguments are still evaluated so call sites stay warning-free.
#![macro_use]
#![allow(unused_macros)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("You may not enable both `defmt` and `log` features.");

#[cfg(all(feature = "defmt", feature = "esp32-log"))]
compile_error!("You may not enable both `defmt` and `esp32-log` features.");

#[cfg(all(feature = "log", feature = "esp32-log"))]
compile_error!("You may not enable both `log` and `esp32-log` features.");

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::trace!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::debug!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::info!($s $(, $x)*);
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log", feature = "esp32-log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::warn!($s $(, $x)*);
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log", feature = "esp32-log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::error!($s $(, $x)*);
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log", feature = "esp32-log")))]
            let _ = ($( & $x ),*);
        }
    };
}
