use std::fs::File;

use memmap2::Mmap;

use crate::memory::MainMemory;

/// Builds a main memory of `size` bytes whose first bytes are the raw contents of `file`
///
/// The image is memory mapped and copied once; after that the simulation never touches the file
pub fn load_memory_image(file: &File, size: usize) -> Result<MainMemory, String> {
    let length = file
        .metadata()
        .map_err(|e| format!("Couldn't read the memory image metadata: {e}"))?
        .len();
    if length > size as u64 {
        return Err(format!("The memory image is {length} bytes, larger than the {size} byte memory"));
    }
    // Mapping an empty file fails on some platforms
    if length == 0 {
        return Ok(MainMemory::new(size));
    }
    let image = unsafe {
        let m = Mmap::map(file).map_err(|e| format!("Couldn't memory map the memory image: {e}"))?;
        #[cfg(unix)]
        m.advise(memmap2::Advice::Sequential).map_err(|e| format!("Failed to provide access advice to the OS, {e}"))?;
        m
    };
    MainMemory::with_image(size, &image)
        .ok_or_else(|| format!("The memory image doesn't fit in the {size} byte memory"))
}
