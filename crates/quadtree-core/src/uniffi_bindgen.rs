//! Binding generator for the quadtree handle
//!
//! Run with: cargo run -p quadtree-core --features uniffi --bin uniffi-bindgen generate --library <path> --language python --out-dir <dir>

fn main() {
    uniffi::uniffi_bindgen_main()
}
