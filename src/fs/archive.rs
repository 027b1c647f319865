//! ustar archive and gzip codecs used by `tar`, `gzip` and `gunzip`.
//!
//! Archives and compressed files are stored in the tree as base64 text,
//! since nodes only hold UTF-8 content.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::types::{FsError, ItemKind};

const BLOCK: usize = 512;
const NAME_LEN: usize = 100;
const PREFIX_LEN: usize = 155;

/// One archive member.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveMember {
    /// Relative path, no leading `/`.
    pub path: String,
    pub kind: ItemKind,
    pub mode: u32,
    pub mtime: i64,
    pub content: Vec<u8>,
    pub link_target: String,
}

fn corrupt(reason: &str) -> FsError {
    FsError::InvalidContent {
        reason: format!("tar: {}", reason),
    }
}

fn put_str(block: &mut [u8], at: usize, width: usize, value: &str) {
    let bytes = value.as_bytes();
    let n = bytes.len().min(width);
    block[at..at + n].copy_from_slice(&bytes[..n]);
}

fn put_octal(block: &mut [u8], at: usize, width: usize, value: u64) {
    let digits = format!("{:0>w$o}", value, w = width - 1);
    let digits = &digits.as_bytes()[digits.len().saturating_sub(width - 1)..];
    block[at..at + digits.len()].copy_from_slice(digits);
    block[at + digits.len()] = 0;
}

fn get_str(block: &[u8], at: usize, width: usize) -> String {
    let field = &block[at..at + width];
    let end = field.iter().position(|&b| b == 0).unwrap_or(width);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn get_octal(block: &[u8], at: usize, width: usize) -> u64 {
    u64::from_str_radix(get_str(block, at, width).trim(), 8).unwrap_or(0)
}

/// Header checksum with the checksum field itself counted as spaces.
fn checksum(block: &[u8]) -> u64 {
    block
        .iter()
        .enumerate()
        .map(|(i, &b)| if (148..156).contains(&i) { b' ' as u64 } else { b as u64 })
        .sum()
}

/// Split a long path into ustar `prefix` and `name` fields.
fn split_long_path(path: &str) -> Result<(&str, &str), FsError> {
    if path.len() <= NAME_LEN {
        return Ok(("", path));
    }
    path.match_indices('/')
        .map(|(i, _)| (&path[..i], &path[i + 1..]))
        .find(|(prefix, name)| prefix.len() <= PREFIX_LEN && name.len() <= NAME_LEN && !name.is_empty())
        .ok_or_else(|| FsError::invalid_argument(path, "tar: path too long"))
}

fn header(member: &ArchiveMember) -> Result<[u8; BLOCK], FsError> {
    let mut block = [0u8; BLOCK];
    let path = match member.kind {
        ItemKind::Directory if !member.path.ends_with('/') => format!("{}/", member.path),
        _ => member.path.clone(),
    };
    let (prefix, name) = split_long_path(&path)?;
    let size = match member.kind {
        ItemKind::File => member.content.len() as u64,
        _ => 0,
    };

    put_str(&mut block, 0, NAME_LEN, name);
    put_octal(&mut block, 100, 8, member.mode as u64);
    put_octal(&mut block, 108, 8, 1000);
    put_octal(&mut block, 116, 8, 1000);
    put_octal(&mut block, 124, 12, size);
    put_octal(&mut block, 136, 12, member.mtime.max(0) as u64);
    block[156] = match member.kind {
        ItemKind::File => b'0',
        ItemKind::Symlink => b'2',
        ItemKind::Directory => b'5',
    };
    if member.kind == ItemKind::Symlink {
        put_str(&mut block, 157, NAME_LEN, &member.link_target);
    }
    block[257..263].copy_from_slice(b"ustar\0");
    block[263..265].copy_from_slice(b"00");
    put_str(&mut block, 265, 32, "user");
    put_str(&mut block, 297, 32, "users");
    put_str(&mut block, 345, PREFIX_LEN, prefix);

    let sum = format!("{:06o}\0 ", checksum(&block));
    block[148..156].copy_from_slice(sum.as_bytes());
    Ok(block)
}

/// Encode members as a ustar archive terminated by two zero blocks.
pub fn pack(members: &[ArchiveMember]) -> Result<Vec<u8>, FsError> {
    let mut out = Vec::new();
    for member in members {
        out.extend_from_slice(&header(member)?);
        if member.kind == ItemKind::File {
            out.extend_from_slice(&member.content);
            let pad = (BLOCK - member.content.len() % BLOCK) % BLOCK;
            out.resize(out.len() + pad, 0);
        }
    }
    out.resize(out.len() + BLOCK * 2, 0);
    Ok(out)
}

/// Decode a ustar archive.
pub fn unpack(data: &[u8]) -> Result<Vec<ArchiveMember>, FsError> {
    let mut members = Vec::new();
    let mut offset = 0;

    while offset + BLOCK <= data.len() {
        let block = &data[offset..offset + BLOCK];
        offset += BLOCK;
        if block.iter().all(|&b| b == 0) {
            break;
        }
        if get_octal(block, 148, 8) != checksum(block) {
            return Err(corrupt("invalid header checksum"));
        }

        let name = get_str(block, 0, NAME_LEN);
        let prefix = get_str(block, 345, PREFIX_LEN);
        let full = if prefix.is_empty() { name } else { format!("{}/{}", prefix, name) };
        let kind = match block[156] {
            b'5' => ItemKind::Directory,
            b'2' => ItemKind::Symlink,
            _ => ItemKind::File,
        };
        let size = get_octal(block, 124, 12) as usize;

        let content = if kind == ItemKind::File {
            let end = offset + size;
            if end > data.len() {
                return Err(corrupt("unexpected end of archive"));
            }
            let bytes = data[offset..end].to_vec();
            offset += size.div_ceil(BLOCK) * BLOCK;
            bytes
        } else {
            Vec::new()
        };

        members.push(ArchiveMember {
            path: full.trim_end_matches('/').to_string(),
            kind,
            mode: get_octal(block, 100, 8) as u32,
            mtime: get_octal(block, 136, 12) as i64,
            content,
            link_target: get_str(block, 157, NAME_LEN),
        });
    }

    Ok(members)
}

pub fn gzip(data: &[u8]) -> Result<Vec<u8>, FsError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| FsError::InvalidContent { reason: format!("gzip: {}", e) })
}

pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, FsError> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| FsError::InvalidContent { reason: format!("gunzip: {}", e) })?;
    Ok(out)
}

/// Gzip magic bytes.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&[0x1f, 0x8b])
}

pub fn to_text(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn from_text(text: &str) -> Result<Vec<u8>, FsError> {
    BASE64.decode(text.trim()).map_err(|_| FsError::InvalidContent {
        reason: "not a compressed file or archive".to_string(),
    })
}

/// `rwxr-xr-x`-style permissions (with or without the kind letter) to a mode.
pub fn mode_from_permissions(permissions: &str) -> u32 {
    let bits = if permissions.len() == 10 { &permissions[1..] } else { permissions };
    bits.chars()
        .take(9)
        .enumerate()
        .filter(|(_, c)| *c != '-')
        .fold(0, |mode, (i, _)| mode | (1 << (8 - i)))
}

pub fn permissions_from_mode(kind: ItemKind, mode: u32) -> String {
    let lead = match kind {
        ItemKind::Directory => 'd',
        ItemKind::Symlink => 'l',
        ItemKind::File => '-',
    };
    let flags = ['r', 'w', 'x'];
    std::iter::once(lead)
        .chain((0..9).map(|i| if mode & (1 << (8 - i)) != 0 { flags[i % 3] } else { '-' }))
        .collect()
}
