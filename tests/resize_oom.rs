//! Caps single heap allocations on the test thread to drive resizing into its failure paths.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::num::NonZeroU32;
use std::ptr;

use handmade_platform::{Backbuffer, PlatformError, RenderTarget, SurfaceInterface};

struct CappedAlloc;

thread_local! {
    /// Largest allocation allowed on this thread, `usize::MAX` when uncapped.
    static CAP: Cell<usize> = const { Cell::new(usize::MAX) };
}

fn cap() -> usize {
    CAP.try_with(Cell::get).unwrap_or(usize::MAX)
}

unsafe impl GlobalAlloc for CappedAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.size() > cap() {
            return ptr::null_mut();
        }
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CappedAlloc = CappedAlloc;

/// Run `f` with every allocation larger than `limit` bytes refused.
fn with_cap<R>(limit: usize, f: impl FnOnce() -> R) -> R {
    CAP.with(|c| c.set(limit));
    let result = f();
    CAP.with(|c| c.set(usize::MAX));
    result
}

struct SizeOnly {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl SurfaceInterface for SizeOnly {
    fn width(&self) -> NonZeroU32 {
        self.width
    }

    fn height(&self) -> NonZeroU32 {
        self.height
    }
}

#[derive(Default)]
struct CountingTarget {
    created: usize,
}

impl RenderTarget for CountingTarget {
    type Surface = SizeOnly;

    fn create_surface(
        &mut self,
        width: NonZeroU32,
        height: NonZeroU32,
    ) -> Result<SizeOnly, PlatformError> {
        self.created += 1;
        Ok(SizeOnly { width, height })
    }

    fn update_surface(
        &mut self,
        _surface: &mut SizeOnly,
        _pixels: &[u8],
        _pitch: usize,
    ) -> Result<(), PlatformError> {
        Ok(())
    }

    fn display(&mut self, _surface: &SizeOnly) -> Result<(), PlatformError> {
        Ok(())
    }
}

fn drawn_10x10(target: &mut CountingTarget) -> Backbuffer<SizeOnly> {
    let mut backbuffer = Backbuffer::new();
    backbuffer.resize(target, 10, 10).unwrap();
    backbuffer.fill_gradient(3, 5).unwrap();
    assert!(backbuffer.is_dirty());
    backbuffer
}

#[test]
fn refused_allocation_leaves_store_empty() {
    let mut target = CountingTarget::default();
    let mut backbuffer = drawn_10x10(&mut target);

    let result = with_cap(1000, || backbuffer.resize(&mut target, 100, 100));
    match result {
        Err(PlatformError::OutOfMemory { bytes, .. }) => assert_eq!(bytes, 100 * 100 * 4),
        other => panic!("expected an allocation failure, got {other:?}"),
    }

    assert_eq!((backbuffer.width(), backbuffer.height()), (0, 0));
    assert_eq!(backbuffer.pitch(), 0);
    assert!(!backbuffer.is_allocated());
    assert!(backbuffer.pixels().is_none());
    assert!(backbuffer.surface().is_none());
    assert!(!backbuffer.is_dirty());
    // No surface is created for memory that was never obtained.
    assert_eq!(target.created, 1);

    // An empty store has nothing to present, and a later resize recovers.
    assert!(matches!(
        backbuffer.present(&mut target),
        Err(PlatformError::NotAllocated)
    ));
    backbuffer.resize(&mut target, 100, 100).unwrap();
    assert_eq!(backbuffer.pixels().unwrap().len(), 100 * 100 * 4);
    assert_eq!(target.created, 2);
}

#[test]
fn overflowing_size_keeps_previous_allocation() {
    let mut target = CountingTarget::default();
    let mut backbuffer = drawn_10x10(&mut target);
    let before = backbuffer.pixels().unwrap().to_vec();

    match backbuffer.resize(&mut target, u32::MAX, u32::MAX) {
        Err(PlatformError::SizeOutOfRange { width, height }) => {
            assert_eq!((width.get(), height.get()), (u32::MAX, u32::MAX));
        }
        other => panic!("expected the size to be rejected, got {other:?}"),
    }

    assert_eq!((backbuffer.width(), backbuffer.height()), (10, 10));
    assert_eq!(backbuffer.pixels().unwrap(), before.as_slice());
    assert!(backbuffer.surface().is_some());
    assert!(backbuffer.is_dirty());
    assert_eq!(target.created, 1);
}
