fn main() {
    // ESP-IDF sysenv only exists when building for the target.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
