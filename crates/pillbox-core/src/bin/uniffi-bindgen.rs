//! Generates foreign-language bindings for `pillbox_core`.
//!
//! ```text
//! cargo run --bin uniffi-bindgen generate --library target/debug/libpillbox_core.dylib \
//!     --language swift --out-dir bindings
//! ```

fn main() {
    uniffi::uniffi_bindgen_main()
}
