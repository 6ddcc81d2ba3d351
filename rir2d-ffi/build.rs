// Puts `rir2d.h` into $OUT_DIR: generated by `cbindgen` when it is on PATH,
// otherwise the checked-in `include/rir2d.h`. Header problems only produce
// cargo warnings; the library itself never depends on the header.

use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

fn cbindgen(crate_dir: &Path, out: &Path) -> Result<(), String> {
    let status = Command::new("cbindgen")
        .args(["--crate", "rir2d-ffi", "--lang", "C", "--output"])
        .arg(out)
        .current_dir(crate_dir)
        .status()
        .map_err(|e| format!("cbindgen not runnable ({e})"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("cbindgen exited with {status}"))
    }
}

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/rir2d.h");

    let (Some(crate_dir), Some(out_dir)) = (env::var_os("CARGO_MANIFEST_DIR"), env::var_os("OUT_DIR")) else {
        println!("cargo:warning=rir2d-ffi: CARGO_MANIFEST_DIR/OUT_DIR unset; skipping header");
        return;
    };
    let crate_dir = PathBuf::from(crate_dir);
    let checked_in = crate_dir.join("include").join("rir2d.h");
    let header = PathBuf::from(out_dir).join("rir2d.h");

    match cbindgen(&crate_dir, &header) {
        Ok(()) => {
            println!("cargo:warning=rir2d-ffi: generated header with cbindgen -> {}", header.display());
            return;
        }
        Err(why) => println!("cargo:warning=rir2d-ffi: {why}; using include/rir2d.h"),
    }

    if let Err(e) = std::fs::copy(&checked_in, &header) {
        println!(
            "cargo:warning=rir2d-ffi: could not copy {} to OUT_DIR ({e}); C consumers should include it directly",
            checked_in.display()
        );
    }
}
