//! 分段与拼音生成性能基准测试

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hanyu_admin_lib::authoring::{form::stripped, FormValues};
use hanyu_admin_lib::segmentation::{romanize_spaced, segment_text, SegmentationMode, ToneStyle};
use serde_json::json;

const SENTENCE: &str = "今天天气很好，我们一起去公园散步，然后在湖边的小餐馆吃午饭。";

fn benchmark_segmentation_modes(c: &mut Criterion) {
    for mode in SegmentationMode::ALL {
        c.bench_function(&format!("segment_{}", mode), |b| {
            b.iter(|| {
                let seg = segment_text(black_box(SENTENCE), mode, ToneStyle::Marks);
                black_box(seg);
            })
        });
    }

    c.bench_function("segment_manual_chunks", |b| {
        b.iter(|| {
            let seg = segment_text(
                black_box("今天;天气;很好;我们;一起;去公园"),
                SegmentationMode::Manual,
                ToneStyle::Marks,
            );
            black_box(seg);
        })
    });
}

fn benchmark_romanization(c: &mut Criterion) {
    for tone in [ToneStyle::Marks, ToneStyle::Numbers, ToneStyle::Plain] {
        c.bench_function(&format!("romanize_{:?}", tone), |b| {
            b.iter(|| black_box(romanize_spaced(black_box(SENTENCE), tone)))
        });
    }
}

fn benchmark_transient_strip(c: &mut Criterion) {
    let form: FormValues = json!({
        "pairs": (0..8).map(|i| json!({
            "label_zh_input": "苹果",
            "label_zh": ["苹", "果"],
            "label_pinyin": ["píng", "guǒ"],
            "label_en": format!("apple {i}")
        })).collect::<Vec<_>>(),
        "instruction": "Match the words"
    })
    .as_object()
    .cloned()
    .unwrap_or_default();

    c.bench_function("strip_transient_matching_form", |b| {
        b.iter(|| black_box(stripped(black_box(&form))))
    });
}

criterion_group!(
    benches,
    benchmark_segmentation_modes,
    benchmark_romanization,
    benchmark_transient_strip
);
criterion_main!(benches);
