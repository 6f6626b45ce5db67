use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phasmowatch::platform::mock::MockPlatform;
use phasmowatch::pointer::{read_identifier, resolve, PointerPath};

const MODULE_BASE: usize = 0x7FF6_0000_0000;

/// A five-link chain ending at a ghost identifier
fn game() -> (MockPlatform, PointerPath) {
    let platform = MockPlatform::new();
    platform.add_module("GameAssembly.dll", MODULE_BASE, 0x1000);

    let nodes = [0x10_0000usize, 0x20_0000, 0x30_0000, 0x40_0000, 0x50_0000];
    platform.write_ptr(MODULE_BASE + 0x200, nodes[0]);
    for node in nodes {
        platform.write_memory(node, &[0u8; 0x100]);
    }
    for pair in nodes.windows(2) {
        platform.write_ptr(pair[0] + 0x18, pair[1]);
    }
    platform.write_value(nodes[4] + 0x40, &7i32);

    let path = PointerPath::new("GameAssembly.dll", 0x200, vec![0x18, 0x18, 0x18, 0x18, 0x40]);
    (platform, path)
}

fn bench_resolve(c: &mut Criterion) {
    let (platform, path) = game();

    c.bench_function("resolve_chain", |b| {
        b.iter(|| resolve(black_box(&platform), black_box(&path)).unwrap())
    });

    let paths = vec![path; 16];
    c.bench_function("read_identifier_16_paths", |b| {
        b.iter(|| read_identifier(black_box(&platform), black_box(&paths)).unwrap())
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
