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

use log::{error, info};

use crate::bridge::ApplicationBridge;
use crate::error::{BootstrapError, Result};
use crate::loader::LibraryLoader;
use crate::manifest::LibraryManifest;

/// Where a bootstrap sequence stands. `HandedOff` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapPhase {
    Pending,
    Loading,
    Ready,
    HandedOff,
    Failed,
}

/// Loads the entries of a manifest one by one, in order, and hands off to the application
/// module once all of them are resident.
///
/// The loaded libraries are owned by the `Bootstrap` and stay resident for as long as it is
/// alive, including after a failure: a partially loaded chain is never unwound.
pub struct Bootstrap<L> {
    manifest: LibraryManifest,
    phase: BootstrapPhase,
    loaded: Vec<L>,
}

impl<L> Bootstrap<L> {
    pub fn new(manifest: LibraryManifest) -> Self {
        let capacity = manifest.len();
        Self { manifest, phase: BootstrapPhase::Pending, loaded: Vec::with_capacity(capacity) }
    }

    pub fn manifest(&self) -> &LibraryManifest {
        &self.manifest
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    /// Libraries loaded so far, in load order.
    pub fn loaded(&self) -> &[L] {
        &self.loaded
    }

    /// Run the sequence. Stops at the first load failure without attempting later entries, and
    /// calls `bridge` exactly once, only after the last entry has loaded.
    pub fn run<T, B>(&mut self, loader: &mut T, bridge: &mut B) -> Result<i32>
    where
        T: LibraryLoader<Library = L>,
        B: ApplicationBridge<L>,
    {
        if self.phase != BootstrapPhase::Pending {
            return Err(BootstrapError::AlreadyRun);
        }
        self.phase = BootstrapPhase::Loading;

        for (index, library) in self.manifest.iter().enumerate() {
            match loader.load(library) {
                Ok(loaded) => self.loaded.push(loaded),
                Err(source) => {
                    error!(
                        "Failed to load {} ({}/{}): {:#}",
                        library,
                        index + 1,
                        self.manifest.len(),
                        source
                    );
                    self.phase = BootstrapPhase::Failed;
                    return Err(BootstrapError::Load { library, index, source });
                }
            }
        }
        self.phase = BootstrapPhase::Ready;
        info!("All {} libraries are resident", self.loaded.len());

        let application = self.manifest.application_module();
        // `LibraryManifest::new` rejects empty manifests and the application module is the last
        // entry, so it is the last loaded library.
        let handle = &self.loaded[self.loaded.len() - 1];
        match bridge.hand_off(handle) {
            Ok(status) => {
                self.phase = BootstrapPhase::HandedOff;
                Ok(status)
            }
            Err(source) => {
                error!("Failed to hand off to {}: {:#}", application, source);
                self.phase = BootstrapPhase::Failed;
                Err(BootstrapError::HandOff { library: application, source })
            }
        }
    }
}
