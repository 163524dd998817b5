//! Crossing the boundary: invoking resolved methods and converting results.
//!
//! The embedded runtime does not unwind into the host. A foreign exception
//! stays pending on the thread until someone looks, so every invocation here
//! checks for one, clears it, and turns it into [`LudiiError::Invocation`]
//! carrying the throwable's `toString()`.

use jni::objects::{JClass, JDoubleArray, JFloatArray, JIntArray, JObject, JObjectArray, JString, JValueOwned};
use jni::sys::{jsize, jvalue};
use jni::JNIEnv;

use crate::error::{LudiiError, Result};

use super::registry::{ClassDescriptor, Op};

/// Object argument for an unchecked call.
pub(crate) fn obj_arg(obj: &JObject) -> jvalue {
    jvalue { l: obj.as_raw() }
}

/// `int` argument for an unchecked call.
pub(crate) fn int_arg(value: i32) -> jvalue {
    jvalue { i: value }
}

/// Clear whatever exception is pending, ignoring failures.
pub(crate) fn clear_pending(env: &mut JNIEnv) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
}

/// Convert the outcome of one JNI call, surfacing a pending exception.
pub(crate) fn check<T>(env: &mut JNIEnv, operation: &'static str, result: jni::errors::Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            if env.exception_check()? {
                return Err(take_exception(env, operation));
            }
            Ok(value)
        }
        Err(jni::errors::Error::JavaException) => Err(take_exception(env, operation)),
        Err(e) => {
            clear_pending(env);
            Err(e.into())
        }
    }
}

fn take_exception(env: &mut JNIEnv, operation: &'static str) -> LudiiError {
    let message = match describe_pending(env) {
        Ok(message) => message,
        Err(e) => {
            clear_pending(env);
            format!("unreadable foreign exception ({e})")
        }
    };
    tracing::warn!(operation, %message, "foreign exception");
    LudiiError::invocation(operation, message)
}

fn describe_pending(env: &mut JNIEnv) -> jni::errors::Result<String> {
    let throwable = env.exception_occurred()?;
    env.exception_clear()?;
    if throwable.is_null() {
        return Ok("exception reported but none pending".to_string());
    }
    let text = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])?
        .l()?;
    let text = JString::from(text);
    let message: String = env.get_string(&text)?.into();
    Ok(message)
}

/// Invoke a resolved instance method on `target`.
pub(crate) fn call<'local>(
    env: &mut JNIEnv<'local>,
    target: &JObject,
    class: &ClassDescriptor,
    op: Op,
    args: &[jvalue],
) -> Result<JValueOwned<'local>> {
    let (id, ret) = class.method(op)?;
    tracing::trace!(class = class.class().name(), op = op.name(), "foreign call");
    // SAFETY: `id` was resolved against the declared signature, `ret` is
    // derived from it, and every caller builds `args` to match it.
    let result = unsafe { env.call_method_unchecked(target, id, ret, args) };
    check(env, op.name(), result)
}

pub(crate) fn call_void(env: &mut JNIEnv, target: &JObject, class: &ClassDescriptor, op: Op, args: &[jvalue]) -> Result<()> {
    Ok(call(env, target, class, op, args)?.v()?)
}

pub(crate) fn call_bool(env: &mut JNIEnv, target: &JObject, class: &ClassDescriptor, op: Op, args: &[jvalue]) -> Result<bool> {
    Ok(call(env, target, class, op, args)?.z()?)
}

pub(crate) fn call_int(env: &mut JNIEnv, target: &JObject, class: &ClassDescriptor, op: Op, args: &[jvalue]) -> Result<i32> {
    Ok(call(env, target, class, op, args)?.i()?)
}

/// Object-returning call; a null result is an invocation error.
pub(crate) fn call_object<'local>(
    env: &mut JNIEnv<'local>,
    target: &JObject,
    class: &ClassDescriptor,
    op: Op,
    args: &[jvalue],
) -> Result<JObject<'local>> {
    let obj = call(env, target, class, op, args)?.l()?;
    non_null(obj, op)
}

/// Invoke a resolved static method; a null result is an invocation error.
pub(crate) fn call_static_object<'local>(
    env: &mut JNIEnv<'local>,
    class: &ClassDescriptor,
    op: Op,
    args: &[jvalue],
) -> Result<JObject<'local>> {
    let (id, ret) = class.static_method(op)?;
    let local = JClass::from(env.new_local_ref(class.class_ref().as_obj())?);
    tracing::trace!(class = class.class().name(), op = op.name(), "foreign static call");
    // SAFETY: as for `call`, the id and return type come from the declared table.
    let result = unsafe { env.call_static_method_unchecked(&local, id, ret, args) };
    let obj = check(env, op.name(), result)?.l()?;
    non_null(obj, op)
}

/// Construct a new foreign object through a resolved constructor.
pub(crate) fn new_object<'local>(
    env: &mut JNIEnv<'local>,
    class: &ClassDescriptor,
    op: Op,
    args: &[jvalue],
) -> Result<JObject<'local>> {
    let id = class.constructor(op)?;
    let local = JClass::from(env.new_local_ref(class.class_ref().as_obj())?);
    tracing::trace!(class = class.class().name(), op = op.name(), "foreign construct");
    // SAFETY: the constructor id was resolved against the declared signature.
    let result = unsafe { env.new_object_unchecked(&local, id, args) };
    let obj = check(env, op.name(), result)?;
    non_null(obj, op)
}

fn non_null<'local>(obj: JObject<'local>, op: Op) -> Result<JObject<'local>> {
    if obj.is_null() {
        return Err(LudiiError::invocation(op.name(), "returned null"));
    }
    Ok(obj)
}

pub(crate) fn read_string(env: &mut JNIEnv, obj: JObject) -> Result<String> {
    let text = JString::from(obj);
    let value: String = env.get_string(&text)?.into();
    Ok(value)
}

pub(crate) fn read_int_array(env: &mut JNIEnv, obj: JObject) -> Result<Vec<i32>> {
    let array = JIntArray::from(obj);
    let len = env.get_array_length(&array)?;
    let mut values = vec![0; len as usize];
    env.get_int_array_region(&array, 0, &mut values)?;
    Ok(values)
}

pub(crate) fn read_double_array(env: &mut JNIEnv, obj: JObject) -> Result<Vec<f64>> {
    let array = JDoubleArray::from(obj);
    let len = env.get_array_length(&array)?;
    let mut values = vec![0.0; len as usize];
    env.get_double_array_region(&array, 0, &mut values)?;
    Ok(values)
}

/// Read a `float[][][]` into channel-major planes.
///
/// Element references are released as they are consumed, so a large board
/// does not exhaust the local frame.
pub(crate) fn read_planes(env: &mut JNIEnv, obj: JObject, op: Op) -> Result<Vec<Vec<Vec<f32>>>> {
    let outer = JObjectArray::from(obj);
    let channels = env.get_array_length(&outer)?;
    let mut planes = Vec::with_capacity(channels as usize);
    for c in 0..channels {
        let plane = JObjectArray::from(element(env, &outer, c, op)?);
        let rows = env.get_array_length(&plane)?;
        let mut plane_rows = Vec::with_capacity(rows as usize);
        for r in 0..rows {
            let row = JFloatArray::from(element(env, &plane, r, op)?);
            let len = env.get_array_length(&row)?;
            let mut values = vec![0.0f32; len as usize];
            env.get_float_array_region(&row, 0, &mut values)?;
            env.delete_local_ref(row)?;
            plane_rows.push(values);
        }
        env.delete_local_ref(plane)?;
        planes.push(plane_rows);
    }
    Ok(planes)
}

fn element<'local>(env: &mut JNIEnv<'local>, array: &JObjectArray, index: jsize, op: Op) -> Result<JObject<'local>> {
    let obj = env.get_object_array_element(array, index)?;
    if obj.is_null() {
        return Err(LudiiError::invocation(op.name(), format!("null sub-array at index {index}")));
    }
    Ok(obj)
}

/// Build a `String[]` from host strings.
pub(crate) fn new_string_array<'local>(env: &mut JNIEnv<'local>, values: &[&str]) -> Result<JObjectArray<'local>> {
    let array = env.new_object_array(values.len() as jsize, "java/lang/String", JObject::null())?;
    for (i, value) in values.iter().enumerate() {
        let text = env.new_string(value)?;
        env.set_object_array_element(&array, i as jsize, &text)?;
        env.delete_local_ref(text)?;
    }
    Ok(array)
}
