#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `checksums` computes content digests for the folder mirror workspace. The
//! reconciler uses fingerprints to decide whether a replica file whose
//! modification time diverged from its source counterpart actually changed,
//! so an unchanged file that was merely re-stamped is never re-copied.
//!
//! The digest is MD5. Collision resistance is not a security requirement
//! here; the fingerprint only has to make accidental collisions between two
//! different versions of the same mirrored file implausible.
//!
//! # Design
//!
//! Files are folded into the hash in fixed-size chunks through the
//! [`digest`] streaming interface, so fingerprinting never buffers more than
//! [`CHUNK_SIZE`] bytes regardless of file size. [`ContentFingerprint`] is a
//! plain 16-byte value type: cheap to copy, comparable with `==`, and
//! rendered as lowercase hex by its [`Display`](std::fmt::Display) impl.
//!
//! # Errors
//!
//! Fingerprinting surfaces [`std::io::Error`] unchanged when the file cannot
//! be opened or a read fails mid-stream (for example because the file was
//! deleted concurrently). Callers attach path context and decide whether the
//! failure is fatal; for the mirror engine it never is.

use digest::Digest;
use md5::Md5;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of bytes read per fold step when fingerprinting a stream.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// MD5 digest of a file's complete contents.
///
/// ```
/// use checksums::ContentFingerprint;
///
/// let fingerprint = ContentFingerprint::of_bytes(b"hello");
/// assert_eq!(fingerprint.to_string(), "5d41402abc4b2a76b9719d911017c592");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentFingerprint([u8; 16]);

impl ContentFingerprint {
    /// Fingerprints the file at `path`, reading it in [`CHUNK_SIZE`] chunks.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        Self::of_reader(File::open(path)?)
    }

    /// Folds an arbitrary reader into a fingerprint.
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Md5::new();
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let read = reader.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            hasher.update(&chunk[..read]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    /// Fingerprints an in-memory buffer.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(Md5::digest(bytes).into())
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
