use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rl_tetris::core::Game;
use rl_tetris::types::Action;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn engine_actions_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut game = Game::new(20, 10, Some(1)).unwrap();
    let script = [
        Action::Left,
        Action::Rotate,
        Action::SoftDrop,
        Action::Right,
        Action::Hold,
        Action::None,
        Action::HardDrop,
    ];

    let allocs = with_alloc_counting(|| {
        // Moves, drops, freezes with line clears and spawns all work in place.
        for i in 0..500 {
            let _ = game.apply_action(script[i % script.len()]);
            let _ = game.take_last_event();
            let _ = game.project_ghost();
            let _ = game.cached_max_height();
        }
    });

    assert_eq!(allocs, 0, "expected no allocations, got {}", allocs);
}
