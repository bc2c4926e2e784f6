fn main() {
    // Propagate the ESP-IDF toolchain environment when building for the
    // device; host builds need nothing.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
