fn main() {
    // Propagate ESP-IDF build environment to dependent crates.
    // Host-target test builds skip this (no IDF toolchain present).
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
