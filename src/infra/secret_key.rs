use anyhow::{Error, Result};
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "rocket-secret-key.pem";
const PEM_LABEL: &str = "ROCKET SECRET KEY";

/// The key used to encrypt private cookies (and thereby the login session).
#[derive(Debug)]
pub(crate) struct RocketSecretKey(pub(crate) Vec<u8>);

impl Distribution<RocketSecretKey> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RocketSecretKey {
        let mut bytes = vec![0; 64];
        rng.fill_bytes(&mut bytes);
        RocketSecretKey(bytes)
    }
}

impl RocketSecretKey {
    /// Reads the key from `directory`, generating and persisting
    /// a new one the first time the application starts.
    pub(crate) fn read_or_generate<R: Rng>(directory: impl AsRef<Path>, rng: &mut R) -> Result<Self> {
        let file_path: PathBuf = directory.as_ref().join(FILE_NAME);
        if let Some(parent) = file_path.parent() {
            create_dir_all(parent)?;
        }
        match write_new(&file_path, rng) {
            Err(e) if is_already_exists_error(&e) => read(&file_path),
            result => result,
        }
    }
}

fn write_new<R: Rng>(file_path: &Path, rng: &mut R) -> Result<RocketSecretKey> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(file_path)?;
    let key: RocketSecretKey = rng.random();
    let pem = pem::encode_string(PEM_LABEL, pem::LineEnding::LF, &key.0)?;
    write!(file, "{pem}")?;
    Ok(key)
}

fn read(file_path: &Path) -> Result<RocketSecretKey> {
    let mut pem = Vec::new();
    File::open(file_path)?.read_to_end(&mut pem)?;
    let (_, key) = pem::decode_vec(&pem)?;
    Ok(RocketSecretKey(key))
}

fn is_already_exists_error(error: &Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == ErrorKind::AlreadyExists)
}
