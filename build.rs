use std::env;

fn main() {
    // macOS only grants bluetooth access to binaries that carry an Info.plist with
    // NSBluetoothAlwaysUsageDescription. A plain binary can embed it in the
    // __TEXT,__info_plist section through the linker.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("macos") {
        let dir = env::var("CARGO_MANIFEST_DIR").expect("No CARGO_MANIFEST_DIR env var");
        let plist = format!("{}/Info.plist", dir);

        println!("cargo:rustc-link-arg=-sectcreate");
        println!("cargo:rustc-link-arg=__TEXT");
        println!("cargo:rustc-link-arg=__info_plist");
        println!("cargo:rustc-link-arg={}", plist);
    }

    println!("cargo:rerun-if-changed=Info.plist");
}
