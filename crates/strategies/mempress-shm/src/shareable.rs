use std::ffi::{CStr, CString};
use std::io;
use std::ptr::{NonNull, null_mut};
use std::sync::{Mutex, Once, PoisonError};

use libc::{
    EEXIST, MAP_SHARED, O_CREAT, O_EXCL, O_RDWR, PROT_READ, PROT_WRITE, S_IRUSR, S_IWUSR, close,
    shm_open, shm_unlink,
};
use log::{debug, info, warn};
use mempress_core::{Allocation, PressureStrategy, Unit, touch};

/// Name of the shared-memory object used unless configured otherwise.
pub const SECTION_NAME: &str = "/ShareableSection";

/// Names of the shared-memory objects this process created.
static CREATED: Mutex<Vec<CString>> = Mutex::new(Vec::new());
static UNLINK_AT_EXIT: Once = Once::new();

extern "C" fn unlink_at_exit() {
    unlink_created_sections();
}

/// Removes the names of all shared-memory objects this process created.
///
/// Runs automatically when the process exits normally. Existing mappings stay valid; the memory
/// is reclaimed once the last view is gone. Objects opened but not created by this process are
/// left alone.
pub fn unlink_created_sections() {
    let mut created = CREATED.lock().unwrap_or_else(PoisonError::into_inner);
    for name in created.drain(..) {
        debug!("Unlinking shared section {:?}", name);
        unsafe { shm_unlink(name.as_ptr()) };
    }
}

fn remember_created(name: &CStr) {
    UNLINK_AT_EXIT.call_once(|| {
        if unsafe { libc::atexit(unlink_at_exit) } != 0 {
            warn!("Failed to register shared section cleanup");
        }
    });
    CREATED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(name.to_owned());
}

/// Opens `name`, creating it if it does not exist. Returns the descriptor and whether this call
/// created the object.
fn open_section(name: &CStr) -> io::Result<(libc::c_int, bool)> {
    let fd = unsafe { shm_open(name.as_ptr(), O_RDWR | O_CREAT | O_EXCL, S_IRUSR | S_IWUSR) };
    if fd != -1 {
        return Ok((fd, true));
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() != Some(EEXIST) {
        return Err(err);
    }
    let fd = unsafe { shm_open(name.as_ptr(), O_RDWR, 0) };
    if fd == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok((fd, false))
}

/// Maps a named shared-memory object read/write.
///
/// The object is created on first use and grown to the requested size; an existing object that
/// is already large enough is mapped as is and never shrunk, so views held by other processes
/// stay valid.
///
/// The creating process removes the name when it exits, like a named section that disappears
/// with its last handle. Processes that only opened an existing object leave the name in place.
/// A process killed by a signal leaves the name behind.
#[derive(Debug, Clone)]
pub struct Shareable {
    name: String,
    touch: bool,
}

impl Shareable {
    /// Map the section without touching it (`shareable`).
    pub fn lazy(name: impl Into<String>) -> Self {
        Shareable {
            name: name.into(),
            touch: false,
        }
    }

    /// Map the section and fault every page in (`shareable_touch`).
    pub fn touched(name: impl Into<String>) -> Self {
        Shareable {
            name: name.into(),
            touch: true,
        }
    }

    /// Name of the shared-memory object.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn map_view(&self, len: usize) -> io::Result<NonNull<u8>> {
        let name = CString::new(self.name.as_str())?;
        let (fd, created) = open_section(&name)?;
        if created {
            debug!("Created shared section {}", self.name);
            remember_created(&name);
        }
        let view = map_section(fd, len);
        // the mapping keeps the object alive
        unsafe { close(fd) };
        view
    }
}

fn map_section(fd: libc::c_int, len: usize) -> io::Result<NonNull<u8>> {
    let mut stat: libc::stat = unsafe { std::mem::zeroed() };
    if unsafe { libc::fstat(fd, &mut stat) } == -1 {
        return Err(io::Error::last_os_error());
    }
    if (stat.st_size as u64) < len as u64 {
        debug!("Growing section from {} to {} bytes", stat.st_size, len);
        if unsafe { libc::ftruncate(fd, len as libc::off_t) } == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    let v = unsafe { libc::mmap(null_mut(), len, PROT_READ | PROT_WRITE, MAP_SHARED, fd, 0) };
    if v == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }
    NonNull::new(v as *mut u8).ok_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable))
}

impl PressureStrategy for Shareable {
    type Error = io::Error;

    fn unit(&self) -> Unit {
        Unit::Bytes
    }

    fn run(&self, amount: usize) -> Result<Allocation, Self::Error> {
        info!("Mapping shared section {}", self.name);
        let ptr = self.map_view(amount)?;
        debug!("Mapped {} bytes of {} at {:p}", amount, self.name, ptr);
        if self.touch {
            // shared read/write view of at least `amount` bytes
            unsafe { touch(ptr, amount) };
            debug!("Faulted in {} bytes at {:p}", amount, ptr);
        }
        Ok(Allocation::Mapped { ptr, len: amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mempress_core::resident_pages;
    use mempress_core::util::{Size, page_size};
    use std::fs;

    struct TestSection(String);

    impl TestSection {
        fn new() -> Self {
            TestSection(format!("/mempress-test-{:016x}", rand::random::<u64>()))
        }

        fn len(&self) -> anyhow::Result<u64> {
            Ok(fs::metadata(format!("/dev/shm{}", self.0))?.len())
        }
    }

    impl Drop for TestSection {
        fn drop(&mut self) {
            if let Ok(name) = CString::new(self.0.as_str()) {
                unsafe { libc::shm_unlink(name.as_ptr()) };
            }
        }
    }

    #[test]
    fn test_views_share_content() -> anyhow::Result<()> {
        let section = TestSection::new();
        let strategy = Shareable::lazy(section.0.as_str());
        let len = 4 * page_size();
        let (a, _) = strategy.run(len)?.region().expect("mapped");
        let (b, _) = strategy.run(len)?.region().expect("mapped");
        assert_ne!(a, b);
        unsafe {
            a.as_ptr().add(page_size() + 3).write_volatile(0x5a);
            assert_eq!(b.as_ptr().add(page_size() + 3).read_volatile(), 0x5a);
            b.as_ptr().write_volatile(0xa5);
            assert_eq!(a.as_ptr().read_volatile(), 0xa5);
        }
        Ok(())
    }

    #[test]
    fn test_lazy_view_is_not_resident() -> anyhow::Result<()> {
        let section = TestSection::new();
        let len = Size::KB(256).bytes();
        let (ptr, _) = Shareable::lazy(section.0.as_str())
            .run(len)?
            .region()
            .expect("mapped");
        assert_eq!(resident_pages(ptr, len)?, 0);
        Ok(())
    }

    #[test]
    fn test_touched_view_is_resident() -> anyhow::Result<()> {
        let section = TestSection::new();
        let len = Size::KB(256).bytes();
        let (ptr, _) = Shareable::touched(section.0.as_str())
            .run(len)?
            .region()
            .expect("mapped");
        assert_eq!(resident_pages(ptr, len)?, len / page_size());
        Ok(())
    }

    #[test]
    fn test_section_never_shrinks() -> anyhow::Result<()> {
        let section = TestSection::new();
        let strategy = Shareable::lazy(section.0.as_str());
        strategy.run(page_size())?;
        assert_eq!(section.len()?, page_size() as u64);
        strategy.run(8 * page_size())?;
        assert_eq!(section.len()?, 8 * page_size() as u64);
        strategy.run(2 * page_size())?;
        assert_eq!(section.len()?, 8 * page_size() as u64);
        Ok(())
    }

    /// Runs `strategy` with `len` in a forked child that exits normally.
    fn run_in_child(strategy: &Shareable, len: usize) -> libc::c_int {
        let pid = unsafe { libc::fork() };
        assert!(pid >= 0, "fork: {}", io::Error::last_os_error());
        if pid == 0 {
            let code = match strategy.run(len) {
                Ok(_) => 0,
                Err(_) => 1,
            };
            unsafe { libc::exit(code) };
        }
        let mut status = 0;
        assert_eq!(unsafe { libc::waitpid(pid, &mut status, 0) }, pid);
        assert!(libc::WIFEXITED(status));
        libc::WEXITSTATUS(status)
    }

    #[test]
    fn test_creator_exit_removes_section() -> anyhow::Result<()> {
        let section = TestSection::new();
        let strategy = Shareable::touched(section.0.as_str());
        let len = 8 * page_size();
        assert_eq!(run_in_child(&strategy, len), 0);
        assert!(fs::metadata(format!("/dev/shm{}", section.0)).is_err());

        // a later untouched run starts from fresh, non-resident pages
        let (ptr, _) = Shareable::lazy(section.0.as_str())
            .run(len)?
            .region()
            .expect("mapped");
        assert_eq!(resident_pages(ptr, len)?, 0);
        Ok(())
    }

    #[test]
    fn test_opener_exit_keeps_section() -> anyhow::Result<()> {
        let section = TestSection::new();
        let name = CString::new(section.0.as_str())?;
        let (fd, created) = open_section(&name)?;
        assert!(created);
        unsafe { close(fd) };

        assert_eq!(run_in_child(&Shareable::touched(section.0.as_str()), page_size()), 0);
        assert_eq!(section.len()?, page_size() as u64);
        Ok(())
    }

    #[test]
    fn test_open_section_reports_creation() -> anyhow::Result<()> {
        let section = TestSection::new();
        let name = CString::new(section.0.as_str())?;
        let (first, created) = open_section(&name)?;
        let (second, reopened) = open_section(&name)?;
        unsafe {
            close(first);
            close(second);
        }
        assert!(created);
        assert!(!reopened);
        Ok(())
    }

    #[test]
    fn test_invalid_name_fails() {
        assert!(Shareable::lazy("/bad\0name").run(page_size()).is_err());
    }
}
