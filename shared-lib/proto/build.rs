use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fall back to the bundled protoc when none is installed
    if env::var_os("PROTOC").is_none() {
        env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    #[allow(unused_mut)]
    let mut config = tonic_build::configure()
        .build_server(true)
        .build_client(true);

    // Enable file descriptor set for reflection if the feature is enabled
    #[cfg(feature = "reflection")]
    {
        let out_dir = std::path::PathBuf::from(env::var("OUT_DIR")?);
        config = config.file_descriptor_set_path(out_dir.join("record_descriptor.bin"));
    }

    config.compile_protos(&["proto/record.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/record.proto");
    Ok(())
}
