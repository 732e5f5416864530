use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tinyraster::bench::{rasterize_triangle, DepthShader, FlatShader};
use tinyraster::math::mat4::Mat4;
use tinyraster::math::vec2::Vec2;
use tinyraster::math::vec3::Vec3;
use tinyraster::math::vec4::Vec4;
use tinyraster::model::{Model, Triangle, Vertex};
use tinyraster::render::{render, ColorBuffer, DepthBuffer};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn screen_triangle(points: [(f32, f32); 3]) -> [Vec4; 3] {
    points.map(|(x, y)| Vec4::point(x, y, 0.5))
}

fn small_triangle() -> [Vec4; 3] {
    screen_triangle([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)])
}

fn medium_triangle() -> [Vec4; 3] {
    screen_triangle([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)])
}

fn large_triangle() -> [Vec4; 3] {
    screen_triangle([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)])
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let mut shader = DepthShader::new(Mat4::identity());

    for (name, triangle) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("depth", name), &triangle, |b, tri| {
            let mut color = ColorBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                depth.clear();
                rasterize_triangle(
                    black_box(*tri),
                    &[(); 3],
                    &mut shader,
                    Some(&mut color),
                    &mut depth,
                );
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    // A 20x20 grid of small triangles in normalized device coordinates.
    let vertex = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec2::ZERO, Vec3::FORWARD);
    let triangles: Vec<Triangle> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 0.1 - 1.0;
                let y = row as f32 * 0.1 - 1.0;
                Triangle::new(
                    vertex(x, y),
                    vertex(x + 0.09, y),
                    vertex(x + 0.045, y + 0.08),
                )
            })
        })
        .collect();
    let model = Model::new("grid", triangles).expect("grid is not empty");
    let viewport = Mat4::viewport(0.0, 0.0, BUFFER_WIDTH as f32, BUFFER_HEIGHT as f32);

    group.bench_function("flat_400_triangles", |b| {
        let mut shader = FlatShader::new(viewport, Vec3::new(0.0, 0.0, -1.0));
        let mut color = ColorBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            depth.clear();
            render(black_box(&model), &mut shader, Some(&mut color), &mut depth)
        });
    });

    group.bench_function("depth_only_400_triangles", |b| {
        let mut shader = DepthShader::new(viewport);
        let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            depth.clear();
            render(black_box(&model), &mut shader, None, &mut depth)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_many_triangles);
criterion_main!(benches);
