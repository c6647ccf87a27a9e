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

#[cfg(test)]
mod bootstrap_sequence_tests {
    use anyhow::{anyhow, Result};
    use native_bootstrap::{
        library_manifest, ApplicationBridge, Bootstrap, BootstrapError, BootstrapPhase, LibraryId,
        LibraryLoader, Variant,
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Load(LibraryId),
        HandOff(LibraryId),
    }

    type EventLog = Rc<RefCell<Vec<Event>>>;

    /// Records every load attempt and fails on the configured library.
    struct RecordingLoader {
        events: EventLog,
        fail_on: Option<LibraryId>,
    }

    impl LibraryLoader for RecordingLoader {
        type Library = LibraryId;

        fn load(&mut self, library: LibraryId) -> Result<LibraryId> {
            self.events.borrow_mut().push(Event::Load(library));
            if self.fail_on == Some(library) {
                return Err(anyhow!("dlopen failed: library \"{}\" not found", library.file_name()));
            }
            Ok(library)
        }
    }

    struct RecordingBridge {
        events: EventLog,
    }

    impl ApplicationBridge<LibraryId> for RecordingBridge {
        fn hand_off(&mut self, application: &LibraryId) -> Result<i32> {
            self.events.borrow_mut().push(Event::HandOff(*application));
            Ok(0)
        }
    }

    fn run(
        variant: Variant,
        fail_on: Option<LibraryId>,
    ) -> (Vec<Event>, Result<i32, BootstrapError>) {
        let events = EventLog::default();
        let mut loader = RecordingLoader { events: events.clone(), fail_on };
        let mut bridge = RecordingBridge { events: events.clone() };
        let mut bootstrap = Bootstrap::new(library_manifest(variant));
        let result = bootstrap.run(&mut loader, &mut bridge);
        let events = events.borrow().clone();
        (events, result)
    }

    #[test]
    fn dependencies_precede_dependents_in_every_variant() {
        for variant in Variant::ALL {
            let manifest = library_manifest(variant);
            let hidapi = manifest.position(LibraryId::HIDAPI).unwrap();
            let sdl = manifest.position(LibraryId::SDL2).unwrap();
            let app = manifest.position(LibraryId::APPLICATION).unwrap();
            assert!(hidapi < sdl && sdl < app, "{variant}: {:?}", manifest.libraries());
            if let Some(image) = manifest.position(LibraryId::SDL2_IMAGE) {
                assert!(sdl < image && image < app, "{variant}: {:?}", manifest.libraries());
            }
        }
    }

    #[test]
    fn manifest_is_idempotent() {
        for variant in Variant::ALL {
            assert_eq!(library_manifest(variant), library_manifest(variant));
        }
    }

    #[test]
    fn observed_orders_are_preserved() {
        assert_eq!(
            library_manifest(Variant::Base).libraries(),
            &[LibraryId::HIDAPI, LibraryId::SDL2, LibraryId::APPLICATION]
        );
        assert_eq!(
            library_manifest(Variant::MediaDecoding).libraries(),
            &[LibraryId::HIDAPI, LibraryId::SDL2, LibraryId::SDL2_IMAGE, LibraryId::APPLICATION]
        );
    }

    #[test]
    fn extension_is_inserted_between_runtime_and_application() {
        let base = library_manifest(Variant::Base);
        let extended = library_manifest(Variant::MediaDecoding);
        let app = base.position(LibraryId::APPLICATION).unwrap();

        let mut expected = base.libraries().to_vec();
        expected.insert(app, LibraryId::SDL2_IMAGE);
        assert_eq!(extended.libraries(), expected.as_slice());
        let sdl = extended.position(LibraryId::SDL2).unwrap();
        assert_eq!(extended.position(LibraryId::SDL2_IMAGE), Some(sdl + 1));
    }

    #[test]
    fn shared_libraries_keep_their_relative_order_across_variants() {
        for a in Variant::ALL {
            for b in Variant::ALL {
                let (ma, mb) = (library_manifest(a), library_manifest(b));
                let shared_in_a: Vec<_> = ma.iter().filter(|l| mb.position(*l).is_some()).collect();
                let shared_in_b: Vec<_> = mb.iter().filter(|l| ma.position(*l).is_some()).collect();
                assert_eq!(shared_in_a, shared_in_b, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn runtime_failure_prevents_loading_the_application() {
        let (events, result) = run(Variant::Base, Some(LibraryId::SDL2));
        assert_eq!(events, vec![Event::Load(LibraryId::HIDAPI), Event::Load(LibraryId::SDL2)]);
        match result {
            Err(BootstrapError::Load { library, index, source }) => {
                assert_eq!(library, LibraryId::SDL2);
                assert_eq!(index, 1);
                assert!(source.to_string().contains("not found"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn extended_variant_hands_off_once_after_the_fourth_load() {
        let (events, result) = run(Variant::MediaDecoding, None);
        assert_eq!(result.unwrap(), 0);
        assert_eq!(
            events,
            vec![
                Event::Load(LibraryId::HIDAPI),
                Event::Load(LibraryId::SDL2),
                Event::Load(LibraryId::SDL2_IMAGE),
                Event::Load(LibraryId::APPLICATION),
                Event::HandOff(LibraryId::APPLICATION),
            ]
        );
    }

    #[test]
    fn failure_on_any_entry_never_reaches_the_bridge() {
        for variant in Variant::ALL {
            for library in library_manifest(variant).iter() {
                let (events, result) = run(variant, Some(library));
                let handed_off = events.iter().any(|e| matches!(e, Event::HandOff(_)));
                assert!(!handed_off, "{variant}/{library}");
                assert_eq!(events.last(), Some(&Event::Load(library)));
                assert!(
                    matches!(result, Err(BootstrapError::Load { library: l, .. }) if l == library)
                );
            }
        }
    }

    #[test]
    fn load_error_message_names_the_library() {
        let (_, result) = run(Variant::MediaDecoding, Some(LibraryId::SDL2_IMAGE));
        let err = anyhow::Error::from(result.unwrap_err());
        let message = format!("{err:#}");
        assert!(
            message.starts_with("failed to load library SDL2_image (manifest entry 2)"),
            "{message}"
        );
        assert!(message.contains(&LibraryId::SDL2_IMAGE.file_name()), "{message}");
    }

    #[test]
    fn phase_tracks_the_sequence() {
        let events = EventLog::default();
        let mut loader =
            RecordingLoader { events: events.clone(), fail_on: Some(LibraryId::HIDAPI) };
        let mut bridge = RecordingBridge { events: events.clone() };
        let mut bootstrap = Bootstrap::new(library_manifest(Variant::Base));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Pending);
        assert!(bootstrap.run(&mut loader, &mut bridge).is_err());
        assert_eq!(bootstrap.phase(), BootstrapPhase::Failed);
        assert!(bootstrap.loaded().is_empty());
    }
}
