use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// 把运行时配置文件复制到 target/debug 或 target/release，方便直接运行二进制
fn main() {
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=Failed to get OUT_DIR: {}", e);
            return;
        }
    };

    let target_dir = match out_dir.ancestors().nth(3) {
        Some(path) => path,
        None => {
            println!("cargo:warning=Failed to determine target directory");
            return;
        }
    };

    let files_to_copy = ["log4rs.yaml", "config.toml"];

    for name in &files_to_copy {
        let src_path = Path::new(name);
        if !src_path.exists() {
            continue;
        }
        if let Err(e) = fs::copy(src_path, target_dir.join(name)) {
            println!("cargo:warning=Failed to copy {}: {:?}", name, e);
        }
    }

    for name in &files_to_copy {
        println!("cargo:rerun-if-changed={}", name);
    }
}
