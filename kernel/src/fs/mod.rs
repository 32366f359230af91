// On-disk file system format.
// Both the kernel and user programs use this header file.

pub(crate) mod fs;

use core::mem;
use crate::stat::FileType;

pub const ROOTINO: u32 = 1;   // root i-number
pub const BSIZE: usize = 1024;  // block size

// Disk layout:
// [ boot block | super block | log | inode blocks |
//                                          free bit map | data blocks]
//
// mkfs computes the super block and builds an initial file system. The
// super block describes the disk layout:
#[derive(Copy, Clone)]
#[repr(C)]
pub struct SuperBlock {
    magic: u32, // Must be FSMAGIC
    size: u32, // Size of file system image (blocks)
    nblocks: u32, // Number of data blocks
    ninodes: u32, // Number of inodes.
    nlog: u32, // Number of log blocks
    logstart: u32, // Block number of first log block
    inodestart: u32, // Block number of first inode block
    bmapstart: u32, // Block number of first free map block
}

const FSMAGIC: u32 = 0x10203040;
pub const NDIRECT: usize = 12;
const NINDIRECT: usize = BSIZE / mem::size_of::<u32>(); // BSIZE / sizeof(uint)
const MAXFILE: usize = NDIRECT + NINDIRECT;

// On-disk inode structure
#[derive(Copy, Clone)]
#[repr(C)]
struct DINode {
    file_type: FileType, // File type
    major: i16, // Major device number (T_DEVICE only)
    minor: i16, // Minor device number (T_DEVICE only)
    nlink: i16, // Number of links to inode in file system
    size: u32, // Size of file (bytes)
    addrs: [u32; NDIRECT + 1], // Data block addresses
}

// Inodes per block.
const IPB: u32 = (BSIZE / mem::size_of::<DINode>()) as u32;

// Block containing inode i
#[macro_export]
macro_rules! IBLOCK {
    ( $i:expr, $sb:expr ) => {
        $i / IPB + $sb.inodestart
    };
}

// Bitmap bits per block
const BPB: u32 = (BSIZE * 8) as u32;

// Block of free map containing bit for block b
#[macro_export]
macro_rules! BBLOCK {
    ( $b:expr, $sb:expr ) => {
        $b / BPB + $sb.bmapstart
    };
}

// Directory is a file containing a sequence of dirent structures.
const DIRSIZ: usize = 14;

#[derive(Copy, Clone)]
#[repr(C)]
struct Dirent {
    inum: u16,
    name: [u8; DIRSIZ],
}

// Encode a directory entry name into its fixed-width, nul-padded on-disk
// form, truncating (never panicking) on names longer than DIRSIZ.
pub(crate) fn encode_dirent_name(name: &[u8]) -> [u8; DIRSIZ] {
    let mut out = [0u8; DIRSIZ];
    let n = core::cmp::min(name.len(), DIRSIZ);
    out[..n].copy_from_slice(&name[..n]);
    out
}

// Decode a stored dirent name back to its byte slice, stopping at the first
// nul (or DIRSIZ if the name fills the whole field, which has no nul).
pub(crate) fn decode_dirent_name(stored: &[u8; DIRSIZ]) -> &[u8] {
    let n = stored.iter().position(|&c| c == 0).unwrap_or(DIRSIZ);
    &stored[..n]
}

#[cfg(test)]
mod tests {
    use super::{decode_dirent_name, encode_dirent_name, DIRSIZ};

    #[test]
    fn short_name_is_nul_padded() {
        let encoded = encode_dirent_name(b"bin");
        assert_eq!(&encoded[..3], b"bin");
        assert!(encoded[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn name_longer_than_dirsiz_is_truncated_not_panicked() {
        let long = b"this_name_is_way_too_long_for_a_dirent";
        let encoded = encode_dirent_name(long);
        assert_eq!(&encoded[..], &long[..DIRSIZ]);
    }

    #[test]
    fn name_exactly_dirsiz_has_no_nul_terminator() {
        let exact = b"exactlyfourtn!"; // 14 bytes
        assert_eq!(exact.len(), DIRSIZ);
        let encoded = encode_dirent_name(exact);
        assert_eq!(&encoded[..], &exact[..]);
        assert_eq!(decode_dirent_name(&encoded), &exact[..]);
    }

    #[test]
    fn round_trip_short_name() {
        let encoded = encode_dirent_name(b"init");
        assert_eq!(decode_dirent_name(&encoded), b"init");
    }
}

