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

//! # Native bootstrap java bindings
//!
//! Lets the host activity ask for the library manifest it must load, or have the whole
//! bootstrap run natively. Errors are raised as Java exceptions; the activity is expected to
//! abort startup when one is thrown.

use anyhow::Result;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jint, jobjectArray};
use jni::JNIEnv;
use log::{error, trace};
use native_bootstrap::{
    init_logging, library_manifest, run_bootstrap, BootstrapConfig, BootstrapError, Variant,
};

const ILLEGAL_ARGUMENT_EXCEPTION: &str = "java/lang/IllegalArgumentException";
const UNSATISFIED_LINK_ERROR: &str = "java/lang/UnsatisfiedLinkError";
const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

/// Java class of the exception raised for `err`.
fn exception_class(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<BootstrapError>() {
        Some(BootstrapError::UnknownVariant(_)) => ILLEGAL_ARGUMENT_EXCEPTION,
        Some(BootstrapError::Load { .. }) | Some(BootstrapError::HandOff { .. }) => {
            UNSATISFIED_LINK_ERROR
        }
        _ => RUNTIME_EXCEPTION,
    }
}

fn throw(env: &mut JNIEnv<'_>, err: anyhow::Error) {
    error!("{:#}", err);
    // A JNI call that failed may have left its own exception pending already.
    if env.exception_check().unwrap_or(false) {
        return;
    }
    if env.throw_new(exception_class(&err), format!("{:#}", err)).is_err() {
        error!("Failed to throw a Java exception");
    }
}

/// A null or empty name selects the variant this library was built for.
fn parse_variant(env: &mut JNIEnv<'_>, variant: &JString<'_>) -> Result<Variant> {
    if variant.is_null() {
        return Ok(Variant::current());
    }
    let name: String = env.get_string(variant)?.into();
    if name.is_empty() {
        return Ok(Variant::current());
    }
    Ok(name.parse::<Variant>()?)
}

fn get_libraries<'local>(
    env: &mut JNIEnv<'local>,
    variant: &JString<'local>,
) -> Result<jobjectArray> {
    let variant = parse_variant(env, variant)?;
    let manifest = library_manifest(variant);
    let array = env.new_object_array(manifest.len() as i32, "java/lang/String", JObject::null())?;
    for (i, library) in manifest.iter().enumerate() {
        let name = env.new_string(library.name())?;
        env.set_object_array_element(&array, i as i32, &name)?;
        env.delete_local_ref(name)?;
    }
    trace!("Returning the {} manifest: {:?}", variant, manifest.libraries());
    Ok(array.into_raw())
}

fn load_libraries<'local>(
    env: &mut JNIEnv<'local>,
    variant: &JString<'local>,
    library_dir: &JString<'local>,
) -> Result<jint> {
    let mut config = BootstrapConfig::default().with_variant(parse_variant(env, variant)?);
    if !library_dir.is_null() {
        let dir: String = env.get_string(library_dir)?.into();
        config = config.with_library_path(dir);
    }
    Ok(run_bootstrap(&config)?)
}

/// Returns the names of the libraries to load, in load order.
#[no_mangle]
pub extern "system" fn Java_com_android_nativebootstrap_NativeBootstrap_nativeGetLibraries<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    variant: JString<'local>,
) -> jobjectArray {
    init_logging(&BootstrapConfig::default());
    match get_libraries(&mut env, &variant) {
        Ok(array) => array,
        Err(e) => {
            throw(&mut env, e);
            std::ptr::null_mut()
        }
    }
}

/// Loads every library of the manifest from `libraryDir` and runs the application's entry
/// point on the calling thread. Returns its exit status.
#[no_mangle]
pub extern "system" fn Java_com_android_nativebootstrap_NativeBootstrap_nativeLoadLibraries<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    variant: JString<'local>,
    library_dir: JString<'local>,
) -> jint {
    init_logging(&BootstrapConfig::default());
    match load_libraries(&mut env, &variant, &library_dir) {
        Ok(status) => status,
        Err(e) => {
            throw(&mut env, e);
            -1
        }
    }
}
