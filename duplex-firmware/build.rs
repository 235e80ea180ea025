//! Build script for duplex-firmware
//!
//! embassy-stm32 generates memory.x for the selected chip (`memory-x`
//! feature); this only passes the linker scripts.

fn main() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}
