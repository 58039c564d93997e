//! FFI 接口 - C/C++ 绑定
//!
//! 以 JSON 字符串跨边界传递参数与结果，返回的字符串需用 `mi_string_free` 释放。

use crate::draw::FrameRecorder;
use crate::host::HostApi;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// 创建宿主接口
#[no_mangle]
pub extern "C" fn mi_host_new() -> *mut HostApi {
    Box::into_raw(Box::new(HostApi::new()))
}

/// 销毁宿主接口
#[no_mangle]
pub extern "C" fn mi_host_free(host: *mut HostApi) {
    if !host.is_null() {
        unsafe { drop(Box::from_raw(host)); }
    }
}

/// 调用命令，`bundle_json` 为 `{"args": [...], "kwargs": {...}}`
#[no_mangle]
pub extern "C" fn mi_host_call(
    host: *mut HostApi,
    command: *const c_char,
    bundle_json: *const c_char,
) -> *mut c_char {
    let Some(host) = (unsafe { host.as_mut() }) else {
        return std::ptr::null_mut();
    };
    let (Some(command), Some(payload)) = (read_str(command), read_str(bundle_json)) else {
        return std::ptr::null_mut();
    };
    into_c_string(host.call_json(&command, &payload))
}

/// 绘制一帧到记录型后端，返回绘制命令的 JSON
#[no_mangle]
pub extern "C" fn mi_host_render_json(host: *mut HostApi) -> *mut c_char {
    let Some(host) = (unsafe { host.as_mut() }) else {
        return std::ptr::null_mut();
    };
    let mut recorder = FrameRecorder::new();
    host.render(&mut recorder);
    match recorder.to_json() {
        Ok(json) => into_c_string(json),
        Err(_) => std::ptr::null_mut(),
    }
}

/// 释放由本库返回的字符串
#[no_mangle]
pub extern "C" fn mi_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe { drop(CString::from_raw(s)); }
    }
}

fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok().map(str::to_string)
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).map_or(std::ptr::null_mut(), CString::into_raw)
}
