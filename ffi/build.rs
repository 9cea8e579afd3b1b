fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let include_dir = format!("{crate_dir}/include");

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TRADEDOUBLER_H")
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=C header not generated: {err}");
            return;
        }
    };

    if let Err(err) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=cannot create {include_dir}: {err}");
        return;
    }
    bindings.write_to_file(format!("{include_dir}/tradedoubler.h"));
}
