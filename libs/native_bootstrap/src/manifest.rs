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

//! Per-variant library manifests.
//!
//! A manifest is the ordered list of libraries the host shell must load before control is
//! handed to the application module. The order is a topological order of the dependency
//! graph between the libraries and is declared here, not discovered: `hidapi` before `SDL2`,
//! `SDL2` before any SDL extension, and every library before the application module.

use std::{fmt, str::FromStr};

use crate::error::{BootstrapError, Result};
use crate::library::LibraryId;

/// A build configuration selecting exactly one manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// SDL2 only.
    Base,
    /// SDL2 plus the SDL2_image decoding extension.
    MediaDecoding,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Base, Variant::MediaDecoding];

    /// The variant this binary was built for.
    pub const fn current() -> Self {
        if cfg!(feature = "media-decoding") {
            Variant::MediaDecoding
        } else {
            Variant::Base
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::MediaDecoding => "media-decoding",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| BootstrapError::UnknownVariant(s.to_string()))
    }
}

// Indexed by `Variant as usize`.
const MANIFESTS: [&[LibraryId]; 2] = [
    &[LibraryId::HIDAPI, LibraryId::SDL2, LibraryId::APPLICATION],
    &[LibraryId::HIDAPI, LibraryId::SDL2, LibraryId::SDL2_IMAGE, LibraryId::APPLICATION],
];

// A malformed table entry fails the build.
const _: () = {
    let mut i = 0;
    while i < MANIFESTS.len() {
        assert!(is_well_formed(MANIFESTS[i]), "malformed library manifest declaration");
        i += 1;
    }
};

const fn same_library(a: LibraryId, b: LibraryId) -> bool {
    let (a, b) = (a.name().as_bytes(), b.name().as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// The structural rules `LibraryManifest::new` enforces, usable in const context.
const fn is_well_formed(libraries: &[LibraryId]) -> bool {
    if libraries.is_empty() || !same_library(libraries[libraries.len() - 1], LibraryId::APPLICATION)
    {
        return false;
    }
    let mut i = 0;
    while i < libraries.len() {
        let mut j = 0;
        while j < i {
            if same_library(libraries[i], libraries[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// An ordered sequence of libraries in which every library appears after the libraries it
/// depends upon. The last entry is always the application module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibraryManifest {
    libraries: &'static [LibraryId],
}

impl LibraryManifest {
    /// Validate a declaration. The dependency order itself is trusted; only the structural
    /// rules are checked: not empty, no duplicates, application module last.
    pub fn new(libraries: &'static [LibraryId]) -> Result<Self> {
        let Some(last) = libraries.last() else {
            return Err(BootstrapError::InvalidManifest("the manifest is empty".to_string()));
        };
        for (i, library) in libraries.iter().enumerate() {
            if libraries[..i].contains(library) {
                return Err(BootstrapError::InvalidManifest(format!(
                    "{} is declared more than once",
                    library
                )));
            }
        }
        if *last != LibraryId::APPLICATION {
            return Err(BootstrapError::InvalidManifest(format!(
                "the last entry must be the application module {}, found {}",
                LibraryId::APPLICATION,
                last
            )));
        }
        Ok(Self { libraries })
    }

    pub fn libraries(&self) -> &'static [LibraryId] {
        self.libraries
    }

    pub fn iter(&self) -> impl Iterator<Item = LibraryId> + '_ {
        self.libraries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Index of `library` in load order, if declared.
    pub fn position(&self, library: LibraryId) -> Option<usize> {
        self.libraries.iter().position(|l| *l == library)
    }

    pub fn application_module(&self) -> LibraryId {
        // `new` rejects empty manifests.
        self.libraries[self.libraries.len() - 1]
    }
}

/// Returns the manifest of `variant`. Pure: the same variant always yields the same sequence.
pub fn library_manifest(variant: Variant) -> LibraryManifest {
    LibraryManifest { libraries: MANIFESTS[variant as usize] }
}
