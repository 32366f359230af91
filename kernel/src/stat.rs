#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u16)]
pub enum FileType {
    NO_TYPE = 0,
    T_DIR = 1, // Directory
    T_FILE = 2, // File
    T_DEVICE = 3, // Device
}

#[derive(Copy, Clone)]
#[repr(C)]
pub struct Stat {
    pub dev: i32, // File system's disk device
    pub ino: u32, // Inode number
    pub file_type: FileType, // Type of file
    pub nlink: i16, // Number of links to file
    pub size: usize, // Size of file in bytes
}

impl Stat {
    pub const fn create() -> Self {
        Self {
            dev: 0,
            ino: 0,
            file_type: FileType::NO_TYPE,
            nlink: 0,
            size: 0,
        }
    }
}
