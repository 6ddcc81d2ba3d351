//! C ABI wrapper for rir2d.
//!
//! Exposes a small set of functions to create/destroy a room, query its
//! reflection paths and render an impulse response into a caller buffer.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `Rir2dRoom` (heap-allocated; you own/delete it).
//! - Invalid input never aborts: constructors return null, queries return 0.
//!
//! Threading
//! - A handle is immutable after creation but NOT declared thread-safe; keep
//!   each handle on one thread.

use log::warn;
use rir2d_core::prelude::*;
use rir2d_core::rir::rir_len;

/// Opaque room handle we hand to C.
pub struct Rir2dRoom {
    inner: Room,
}

// --- Creation / destruction -------------------------------------------------------

/// Create a room of `width` x `length` feet with the given source and receiver.
/// Returns null if the dimensions are invalid or either point is not strictly inside.
#[no_mangle]
pub extern "C" fn rir2d_room_create(
    width: f64,
    length: f64,
    source_x: f64,
    source_y: f64,
    receiver_x: f64,
    receiver_y: f64,
) -> *mut Rir2dRoom {
    match Room::new(width, length, Source::new((source_x, source_y)), Receiver::new((receiver_x, receiver_y))) {
        Ok(inner) => Box::into_raw(Box::new(Rir2dRoom { inner })),
        Err(e) => {
            warn!("rir2d_room_create: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroy a room previously returned by `rir2d_room_create`. Null is ignored.
///
/// # Safety
/// `room` must be null or a pointer from `rir2d_room_create` not yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn rir2d_room_destroy(room: *mut Rir2dRoom) {
    if !room.is_null() {
        drop(Box::from_raw(room));
    }
}

// --- Queries ----------------------------------------------------------------------

/// Number of paths `rir2d_room_paths` produces for `order`, or 0 if the order
/// is outside `1..=RIR2D_MAX_ORDER`.
#[no_mangle]
pub extern "C" fn rir2d_path_count(order: u32) -> u64 {
    if order < 1 || order > MAX_REFLECTION_ORDER {
        return 0;
    }
    path_count(order).unwrap_or(0)
}

/// Direct source → receiver distance in feet (negative if `room` is null).
///
/// # Safety
/// `room` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn rir2d_room_direct_path_length(room: *const Rir2dRoom) -> f64 {
    match room.as_ref() {
        Some(r) => r.inner.direct_path_length(),
        None => -1.0,
    }
}

/// Copy delays (s) and gains of every path up to `order` into the two arrays.
///
/// Returns the number of paths written, or 0 on error or if `capacity` is
/// smaller than `rir2d_path_count(order)`.
///
/// # Safety
/// `delays` and `gains` must each point to at least `capacity` writable doubles.
#[no_mangle]
pub unsafe extern "C" fn rir2d_room_paths(
    room: *const Rir2dRoom,
    order: u32,
    delays: *mut f64,
    gains: *mut f64,
    capacity: u32,
) -> u32 {
    let Some(room) = room.as_ref() else { return 0 };
    if delays.is_null() || gains.is_null() {
        return 0;
    }
    let paths = match room.inner.reflection_paths_for_order(order) {
        Ok(p) => p,
        Err(e) => {
            warn!("rir2d_room_paths: {e}");
            return 0;
        }
    };
    if paths.len() > capacity as usize {
        return 0;
    }
    let delays = std::slice::from_raw_parts_mut(delays, paths.len());
    let gains = std::slice::from_raw_parts_mut(gains, paths.len());
    for ((d, g), p) in delays.iter_mut().zip(gains.iter_mut()).zip(&paths) {
        *d = p.delay;
        *g = p.gain;
    }
    paths.len() as u32
}

// --- Rendering -------------------------------------------------------------------

/// Render the normalized RIR for paths up to `order` into `out`.
///
/// The RIR holds `round(length_sec * sample_rate)` samples; returns that
/// count, or 0 on error or if `out_len` is too small. The length is checked
/// against `out_len` before any path is derived.
///
/// # Safety
/// `out` must point to at least `out_len` writable doubles.
#[no_mangle]
pub unsafe extern "C" fn rir2d_room_render(
    room: *const Rir2dRoom,
    order: u32,
    sample_rate: u32,
    length_sec: f64,
    out: *mut f64,
    out_len: u32,
) -> u32 {
    let Some(room) = room.as_ref() else { return 0 };
    if out.is_null() {
        return 0;
    }
    match rir_len(sample_rate, length_sec) {
        Ok(len) if len <= out_len as usize => {}
        Ok(len) => {
            warn!("rir2d_room_render: buffer of {out_len} samples cannot hold {len}");
            return 0;
        }
        Err(e) => {
            warn!("rir2d_room_render: {e}");
            return 0;
        }
    }
    let rir = match room
        .inner
        .reflection_paths_for_order(order)
        .and_then(|paths| build_rir(&paths, sample_rate, length_sec))
    {
        Ok(r) => r,
        Err(e) => {
            warn!("rir2d_room_render: {e}");
            return 0;
        }
    };
    if rir.len() > out_len as usize {
        return 0;
    }
    let out = std::slice::from_raw_parts_mut(out, rir.len());
    out.copy_from_slice(&rir);
    rir.len() as u32
}
