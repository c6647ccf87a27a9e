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

use log::LevelFilter;
use std::path::PathBuf;

use crate::bridge::DEFAULT_ENTRY_SYMBOL;
use crate::manifest::Variant;

const DEFAULT_LOG_TAG: &str = "native_bootstrap";

/// Settings for one bootstrap run.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    pub variant: Variant,
    /// Directories searched, in order, for the library files before deferring to the linker.
    pub library_paths: Vec<PathBuf>,
    pub entry_symbol: String,
    /// Arguments passed to the entry point after the program name.
    pub arguments: Vec<String>,
    pub log_tag: String,
    pub max_log_level: LevelFilter,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            variant: Variant::current(),
            library_paths: Vec::new(),
            entry_symbol: DEFAULT_ENTRY_SYMBOL.to_string(),
            arguments: Vec::new(),
            log_tag: DEFAULT_LOG_TAG.to_string(),
            max_log_level: LevelFilter::Info,
        }
    }
}

impl BootstrapConfig {
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_paths.push(path.into());
        self
    }

    pub fn with_entry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.entry_symbol = symbol.into();
        self
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_log_tag(mut self, tag: impl Into<String>) -> Self {
        self.log_tag = tag.into();
        self
    }

    pub fn with_max_log_level(mut self, level: LevelFilter) -> Self {
        self.max_log_level = level;
        self
    }
}
