fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    // google/protobuf/timestamp.proto ships with the vendored protoc
    let well_known = protoc_bin_vendored::include_path()?;
    // SAFETY: build scripts are single-threaded; nothing else reads the environment yet.
    unsafe {
        std::env::set_var("PROTOC", protoc);
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/pvz.proto"], &[std::path::PathBuf::from("proto"), well_known])?;

    println!("cargo:rerun-if-changed=proto/pvz.proto");
    println!("cargo:rerun-if-changed=migrations");
    Ok(())
}
