use std::{
    collections::HashMap,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    error::LocatorError,
    models::{binary_descriptor::BinaryDescriptor, configuration::PackageManifest},
};

use super::binary_locator::BinaryLocator;

static OS_MAPPING: std::sync::LazyLock<HashMap<&str, &str>> = std::sync::LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("linux", "linux");
    map.insert("macos", "darwin");
    map.insert("windows", "win32");
    map.insert("freebsd", "freebsd");
    map
});

static ARCH_MAPPING: std::sync::LazyLock<HashMap<&str, &str>> = std::sync::LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("x86_64", "x64");
    map.insert("x86", "ia32");
    map.insert("aarch64", "arm64");
    map.insert("arm", "arm");
    map
});

// ELF, Mach-O (32/64 bit, both byte orders), universal Mach-O, PE.
static NATIVE_SIGNATURES: [&[u8]; 7] = [
    b"\x7fELF",
    &[0xfe, 0xed, 0xfa, 0xce],
    &[0xfe, 0xed, 0xfa, 0xcf],
    &[0xce, 0xfa, 0xed, 0xfe],
    &[0xcf, 0xfa, 0xed, 0xfe],
    &[0xca, 0xfe, 0xba, 0xbe],
    b"MZ",
];

/// Places the binding under `<root>/<vendorDir>/<os>-<arch>-<abi>/`.
pub struct VendorBinaryLocator {
    descriptor: BinaryDescriptor,
}

impl VendorBinaryLocator {
    pub fn new(
        manifest: &PackageManifest,
        root: &Path,
        os: &str,
        arch: &str,
    ) -> Result<Self, LocatorError> {
        let unsupported = || LocatorError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };
        let os = OS_MAPPING.get(os).ok_or_else(unsupported)?;
        let arch = ARCH_MAPPING.get(arch).ok_or_else(unsupported)?;
        let abi = &manifest.runtime.abi;

        let path = root
            .join(&manifest.vendor_dir)
            .join(format!("{}-{}-{}", os, arch, abi))
            .join(&manifest.binary_name);
        let url = manifest
            .url_pattern
            .replace("{{version}}", &manifest.version)
            .replace("{{os}}", os)
            .replace("{{arch}}", arch)
            .replace("{{abi}}", abi)
            .replace("{{binaryName}}", &manifest.binary_name);

        Ok(VendorBinaryLocator {
            descriptor: BinaryDescriptor { path, url },
        })
    }

    pub fn for_current_platform(
        manifest: &PackageManifest,
        root: &Path,
    ) -> Result<Self, LocatorError> {
        Self::new(
            manifest,
            root,
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }
}

impl BinaryLocator for VendorBinaryLocator {
    fn descriptor(&self) -> &BinaryDescriptor {
        &self.descriptor
    }

    fn get_binary_path(&self, validate: bool) -> Result<PathBuf, LocatorError> {
        if validate {
            validate_binary(&self.descriptor.path)?;
        }
        Ok(self.descriptor.path.clone())
    }
}

// `get_binary_path` is synchronous, so this reads through std::fs: one
// metadata call and at most four bytes of header.
fn validate_binary(path: &Path) -> Result<(), LocatorError> {
    let invalid = |reason: String| LocatorError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LocatorError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(invalid(e.to_string())),
    };
    if !metadata.is_file() {
        return Err(invalid("not a regular file".to_string()));
    }
    if metadata.len() == 0 {
        return Err(invalid("file is empty".to_string()));
    }

    let mut header = Vec::with_capacity(4);
    std::fs::File::open(path)
        .and_then(|file| file.take(4).read_to_end(&mut header))
        .map_err(|e| invalid(e.to_string()))?;
    if !NATIVE_SIGNATURES
        .iter()
        .any(|signature| header.starts_with(signature))
    {
        return Err(invalid("not a native library".to_string()));
    }
    Ok(())
}
