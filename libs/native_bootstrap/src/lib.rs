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

//! The crate bootstrapping a native SDL application hosted inside a platform UI shell.
//!
//! The host shell loads the libraries of the variant's [`LibraryManifest`] one after another
//! and, once all of them are resident, hands control to the entry point of the application
//! module. Any load failure is fatal to the launch.

use log::info;

mod bootstrap;
mod bridge;
mod config;
mod error;
mod library;
mod loader;
mod manifest;

pub use bootstrap::{Bootstrap, BootstrapPhase};
pub use bridge::{ApplicationBridge, EntryPointBridge, EntryPointFunc, DEFAULT_ENTRY_SYMBOL};
pub use config::BootstrapConfig;
pub use error::{BootstrapError, Result};
pub use library::LibraryId;
pub use loader::{DynamicLinkerLoader, LibraryLoader, LoadedLibrary};
pub use manifest::{library_manifest, LibraryManifest, Variant};

/// Initialize the process logger. Only the first call has an effect.
#[cfg(target_os = "android")]
pub fn init_logging(config: &BootstrapConfig) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_tag(config.log_tag.as_str())
            .with_max_level(config.max_log_level),
    );
}

/// Initialize the process logger. Only the first call has an effect.
#[cfg(not(target_os = "android"))]
pub fn init_logging(config: &BootstrapConfig) {
    // Fails only when a logger is already installed.
    let _ = env_logger::Builder::from_default_env()
        .filter_level(config.max_log_level)
        .try_init();
}

/// Load the configured variant's libraries into this process and run the application's entry
/// point. Returns the entry point's exit status.
pub fn run_bootstrap(config: &BootstrapConfig) -> Result<i32> {
    init_logging(config);
    let manifest = library_manifest(config.variant);
    info!(
        "Bootstrapping variant {} with {} libraries: {:?}",
        config.variant,
        manifest.len(),
        manifest.libraries()
    );

    let mut loader = DynamicLinkerLoader::new(config.library_paths.clone());
    let mut bridge = EntryPointBridge::new(config.entry_symbol.clone(), config.arguments.clone());
    // The libraries stay resident for the rest of the process, even after a failure.
    let bootstrap = Box::leak(Box::new(Bootstrap::new(manifest)));
    bootstrap.run(&mut loader, &mut bridge)
}
