//! Criterion benchmarks for the per-tick hot path.
//!
//! A touch surface can deliver several hundred move notifications per second
//! and the batcher flushes every 20 ms, so coalescing and encoding a frame
//! must stay far below that budget.
//!
//! Run with:
//! ```bash
//! cargo bench --package remote-core --bench frame_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use remote_core::protocol::encode_frame;
use remote_core::{Command, CommandQueue, GestureRecognizer, MouseButton, TextEdit, TextEditBuffer};

fn bench_coalesce_and_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("coalesce_and_encode");
    for moves in [1usize, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(moves), &moves, |b, &moves| {
            b.iter(|| {
                let mut queue = CommandQueue::new();
                for i in 0..moves {
                    queue.enqueue(Command::Move {
                        dx: black_box(i as f64),
                        dy: black_box(-(i as f64)),
                    });
                }
                queue.enqueue(Command::Click(MouseButton::Primary));
                queue.enqueue(Command::TextEdit(TextEdit::new(1, "a", 0)));
                encode_frame(&queue.take())
            })
        });
    }
    group.finish();
}

fn bench_recognizer_move(c: &mut Criterion) {
    c.bench_function("recognizer_move", |b| {
        let mut recognizer = GestureRecognizer::default();
        recognizer.on_press(0);
        let mut t = 0u64;
        b.iter(|| {
            t += 16;
            recognizer.on_move(black_box(3.0), black_box(-2.0), t)
        })
    });
}

fn bench_text_diff(c: &mut Criterion) {
    let buffer = TextEditBuffer::default();
    let content = format!("{}typed text{}", &buffer.left_pad()[..12], buffer.right_pad());
    c.bench_function("text_diff", |b| b.iter(|| buffer.diff(black_box(&content))));
}

criterion_group!(
    benches,
    bench_coalesce_and_encode,
    bench_recognizer_move,
    bench_text_diff
);
criterion_main!(benches);
