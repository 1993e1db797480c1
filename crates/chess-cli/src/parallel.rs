//! Perft divide spread over worker threads.
//!
//! Root moves are dealt round-robin to `threads` scoped workers; each worker
//! counts the subtrees of its moves on its own copy of the child positions.

use chess_rules::{perft, perft_divide, Position};

/// Returns per-root-move node counts for `depth`, sorted by UCI text.
///
/// With one thread (or depth below 2) this is plain [`perft_divide`].
pub fn divide(position: &Position, depth: u32, threads: usize) -> Vec<(String, u64)> {
    if threads <= 1 || depth < 2 {
        return perft_divide(position, depth);
    }

    let moves = position.legal_moves();
    let mut results: Vec<(String, u64)> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let share: Vec<_> = moves.iter().skip(worker).step_by(threads).copied().collect();
                scope.spawn(move || {
                    share
                        .iter()
                        .map(|mv| (mv.to_uci(), perft(&position.play(mv), depth - 1)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| match worker.join() {
                Ok(counts) => counts,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    results.sort_by(|a, b| a.0.cmp(&b.0));
    tracing::debug!(threads, roots = results.len(), "parallel divide finished");
    results
}
