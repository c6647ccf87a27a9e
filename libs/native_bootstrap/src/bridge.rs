//
// Copyright (C) 2025 The Android Open-Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use log::info;
use std::ffi::{c_char, c_int, c_void, CString};

use crate::loader::LoadedLibrary;

/// The entry point SDL applications export once `main` is renamed by SDL_main.h.
pub const DEFAULT_ENTRY_SYMBOL: &str = "SDL_main";

/// Signature of the application's entry point.
pub type EntryPointFunc = unsafe extern "C" fn(argc: c_int, argv: *mut *mut c_char) -> c_int;

/// Receives control once every manifest entry is resident.
pub trait ApplicationBridge<L> {
    /// Transfer control to `application`, the last manifest entry. Returns the exit status of
    /// the native application.
    fn hand_off(&mut self, application: &L) -> Result<i32>;
}

/// Calls the entry point exported by the application module.
pub struct EntryPointBridge {
    entry_symbol: String,
    arguments: Vec<String>,
}

impl EntryPointBridge {
    pub fn new(entry_symbol: String, arguments: Vec<String>) -> Self {
        Self { entry_symbol, arguments }
    }

    fn build_argv(&self, program: &str) -> Result<Vec<CString>> {
        std::iter::once(program)
            .chain(self.arguments.iter().map(String::as_str))
            .map(|arg| CString::new(arg).with_context(|| format!("Invalid argument {:?}", arg)))
            .collect()
    }
}

impl ApplicationBridge<LoadedLibrary> for EntryPointBridge {
    fn hand_off(&mut self, application: &LoadedLibrary) -> Result<i32> {
        let entry_addr: *mut c_void = application.find_symbol(&self.entry_symbol)?;

        // SAFETY: `entry_addr` is a non-null pointer to a function exported by the application
        // module, which must implement its entry point with the `EntryPointFunc` signature.
        let entry: EntryPointFunc = unsafe { std::mem::transmute(entry_addr) };

        let args = self.build_argv(application.library().name())?;
        let argc = c_int::try_from(args.len()).context("Too many arguments")?;
        let mut argv: Vec<*mut c_char> =
            args.iter().map(|arg| arg.as_ptr() as *mut c_char).collect();
        argv.push(std::ptr::null_mut());

        info!("Handing off to {} in {}", self.entry_symbol, application.library());
        // SAFETY: `argv` holds `argc` valid C strings followed by the null pointer, and
        // `args` outlives the call.
        let status = unsafe { entry(argc, argv.as_mut_ptr()) };
        info!("{} returned {}", self.entry_symbol, status);
        Ok(status)
    }
}
