use rand::{rngs::StdRng, Rng, SeedableRng};

use trec_tools::{JudgmentTable, ScoreTable};

fn rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_entropy()
    }
}

/// Random judgments with integer query IDs and labels in 0..=max_label
pub fn random_qrels(
    num_queries: usize,
    docs_per_query: usize,
    max_label: i32,
    seed: Option<u64>,
) -> JudgmentTable {
    let mut rng = rng(seed);
    let mut qrels = JudgmentTable::new();
    for qid in 0..num_queries {
        for doc in 0..docs_per_query {
            let label = rng.gen_range(0..=max_label);
            qrels.insert(&qid.to_string(), &format!("DOC-{}-{}", qid, doc), label);
        }
    }
    qrels
}

/// Random run; lines are generated as a TREC run file would be
pub fn random_run_lines(num_queries: usize, docs_per_query: usize, seed: Option<u64>) -> String {
    let mut rng = rng(seed);
    let mut lines = String::new();
    for qid in 0..num_queries {
        for rank in 0..docs_per_query {
            let score: f64 = rng.gen_range(-10.0..10.0);
            lines.push_str(&format!(
                "{}\tQ0\tD{}\t{}\t{}\trandom\n",
                qid,
                rng.gen_range(0..100_000),
                rank + 1,
                score
            ));
        }
    }
    lines
}

/// Random run with integer query IDs
pub fn random_run(num_queries: usize, docs_per_query: usize, seed: Option<u64>) -> ScoreTable {
    let mut rng = rng(seed);
    let mut run = ScoreTable::new();
    for qid in 0..num_queries {
        for doc in 0..docs_per_query {
            run.insert(
                &qid.to_string(),
                &format!("DOC-{}-{}", qid, doc),
                rng.gen_range(-10.0..10.0),
            );
        }
    }
    run
}
