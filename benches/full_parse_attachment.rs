use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dcgtree::Parser;

const GRAMMAR_SRC: &str = include_str!("../grammars/attachment/grammar.pl");
const LEXICON_SRC: &str = include_str!("../grammars/attachment/lexicon.pl");

fn parse(p: &Parser, input: &str) -> usize {
  p.parse(input).map(|trees| trees.len()).unwrap_or(0)
}

fn criterion_benchmark(c: &mut Criterion) {
  let parser = Parser::new(
    GRAMMAR_SRC.parse().unwrap(),
    LEXICON_SRC.parse().unwrap(),
  );
  let simple_input = "mary saw john";
  let complex_input = "the old man saw a small dog with the telescope in the park";

  c.bench_function("parse simple", |b| {
    b.iter(|| parse(black_box(&parser), black_box(simple_input)))
  });

  c.bench_function("parse attachment ambiguity", |b| {
    b.iter(|| parse(black_box(&parser), black_box(complex_input)))
  });

  c.bench_function("read grammar", |b| {
    b.iter(|| dcgtree::reader::read_grammar(black_box(GRAMMAR_SRC)).unwrap().len())
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
