use anyhow::Result;
use std::collections::HashSet;
use wordsense_core::core::variations::VariationOptions;
use wordsense_core::{
    EngineConfig, InMemoryIndex, PhraseInput, SenseEngine, SimilarityOptions, SynonymOptions,
};

fn similarity_engine() -> Result<SenseEngine<InMemoryIndex>> {
    let index = InMemoryIndex::from_entries([
        ("New_York|GPE", vec![1.0, 1.0, 1.0, 1.0]),
        ("New_York|NOUN", vec![1.0, 2.0, 1.0, 1.0]),
        ("big|ADJ", vec![2.0, 5.0, 4.0, 2.0]),
        ("BIG|ADJ", vec![2.0, 5.0, 4.0, 1.0]),
        ("apple|NOUN", vec![1.0, 3.0, 9.0, 3.0]),
        ("big_apple|NOUN", vec![6.0, 6.0, 6.0, 6.0]),
    ])?;
    Ok(SenseEngine::new(index))
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn it_falls_back_to_existing_senses_for_similarity() -> Result<()> {
    let engine = similarity_engine()?;
    let score = engine.compute_similarity(
        &PhraseInput::from_keys(&["New_York|LOC"]),
        &PhraseInput::from_keys(&["big|ADJ", "apple|NOUN"]),
        &SimilarityOptions::default(),
    )?;
    assert!(close(score, 0.887), "got {score}");
    Ok(())
}

#[test]
fn it_scores_compound_keys_when_joining() -> Result<()> {
    let engine = similarity_engine()?;
    let a = PhraseInput::from_keys(&["New_York|LOC"]);
    let b = PhraseInput::from_keys(&["big|ADJ", "apple|NOUN"]);

    let joined = engine.compute_similarity(
        &a,
        &b,
        &SimilarityOptions {
            attempt_phrase_join_for_compound_phrases: true,
        },
    )?;
    let direct = engine.compute_similarity(
        &a,
        &PhraseInput::from_keys(&["big_apple|NOUN"]),
        &SimilarityOptions::default(),
    )?;

    assert!(close(joined, 1.0), "got {joined}");
    assert!(close(joined, direct));
    Ok(())
}

#[test]
fn it_caps_scored_variants_from_the_engine_config() -> Result<()> {
    let entries = || {
        InMemoryIndex::from_entries([
            ("New_York|GPE", vec![1.0, 0.0]),
            ("New_York|NOUN", vec![0.0, 1.0]),
            ("target|NOUN", vec![0.0, 1.0]),
        ])
    };
    let a = PhraseInput::from_keys(&["New_York|LOC"]);
    let b = PhraseInput::from_keys(&["target|NOUN"]);

    let uncapped = SenseEngine::new(entries()?);
    assert_eq!(uncapped.compute_similarity(&a, &b, &SimilarityOptions::default())?, 1.0);

    let config = EngineConfig {
        similarity_variant_limit: 1,
        ..Default::default()
    };
    let capped = SenseEngine::with_config(entries()?, config);
    assert_eq!(capped.compute_similarity(&a, &b, &SimilarityOptions::default())?, 0.0);
    Ok(())
}

#[test]
fn it_queries_multi_token_phrases_on_request() -> Result<()> {
    let engine = similarity_engine()?;
    let phrase = PhraseInput::from_keys(&["big|ADJ", "apple|NOUN"]);

    assert!(engine.resolve_synonyms(&phrase, &SynonymOptions::default())?.is_empty());

    let options = SynonymOptions {
        allow_multi_token_queries: true,
        ..Default::default()
    };
    let result = engine.resolve_synonyms(&phrase, &options)?;
    assert_eq!(result[0].word, "big apple");
    Ok(())
}

#[test]
fn it_samples_a_sense_for_optional_unknown_tokens() -> Result<()> {
    let engine = similarity_engine()?;
    let ranked = engine.variations(
        &PhraseInput::from_keys(&["foo|ADJ", "apple|NOUN"]),
        &VariationOptions {
            random_sample_for_unknown: true,
            return_only_top_priority: true,
            ..Default::default()
        },
    )?;

    assert!(!ranked.is_empty());
    for variant in &ranked {
        let first = variant.key[0].key().to_key();
        assert!(first == "big|ADJ" || first == "BIG|ADJ", "sampled {first}");
        assert!(!variant.key[0].required);
        assert_eq!(variant.key[1].key().to_key(), "apple|NOUN");
    }

    let score = engine.compute_similarity(
        &PhraseInput::from_keys(&["apple|NOUN"]),
        &PhraseInput::from_keys(&["foo|ADJ", "apple|NOUN"]),
        &SimilarityOptions::default(),
    )?;
    assert!(score > 0.0);
    Ok(())
}

#[test]
fn it_scores_zero_when_a_required_token_is_unknown() -> Result<()> {
    let engine = similarity_engine()?;
    let score = engine.compute_similarity(
        &PhraseInput::from_keys(&["apple|NOUN"]),
        &PhraseInput::from_keys(&["zzz|NOUN"]),
        &SimilarityOptions::default(),
    )?;
    assert_eq!(score, 0.0);
    Ok(())
}

/// Nouns spread around `stone` at growing angles, so scores fall off steadily.
fn fan_engine() -> Result<SenseEngine<InMemoryIndex>> {
    let words = [
        "rock", "pebble", "boulder", "gravel", "slab", "flint", "granite", "marble", "brick",
        "clay", "sand", "dust", "mud", "water", "cloud",
    ];
    let mut entries = vec![("stone|NOUN".to_string(), vec![1.0, 0.0])];
    for (i, word) in words.iter().enumerate() {
        let angle = 0.1 * (i + 1) as f32;
        entries.push((format!("{word}|NOUN"), vec![angle.cos(), angle.sin()]));
    }
    entries.push(("rock|VERB".to_string(), vec![0.99, 0.05]));
    entries.push(("ROCK|NOUN".to_string(), vec![0.995, 0.1]));
    Ok(SenseEngine::new(InMemoryIndex::from_entries(entries)?))
}

#[test]
fn it_returns_thresholded_distinct_synonyms() -> Result<()> {
    let engine = fan_engine()?;
    let options = SynonymOptions {
        min_score: Some(0.5),
        n: 10,
        reduce_multicase: true,
        ..Default::default()
    };
    let result = engine.resolve_synonyms(&"stone|NOUN".into(), &options)?;

    assert!(!result.is_empty());
    assert!(result.len() <= 10);
    assert!(result.iter().all(|m| m.score >= 0.5));
    assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
    let folded: HashSet<String> = result.iter().map(|m| m.word.to_lowercase()).collect();
    assert_eq!(folded.len(), result.len());
    assert!(!folded.contains("stone"));
    Ok(())
}

fn tier_engine() -> Result<SenseEngine<InMemoryIndex>> {
    let index = InMemoryIndex::from_entries([
        ("apple|NOUN", vec![1.0, 0.0, 0.0]),
        ("APPLE|NOUN", vec![0.0, 0.0, 1.0]),
        ("pear|NOUN", vec![0.9, 0.1, 0.0]),
        ("melon|NOUN", vec![0.0, 0.1, 0.9]),
    ])?;
    Ok(SenseEngine::new(index))
}

#[test]
fn it_fills_results_from_lower_tiers() -> Result<()> {
    let engine = tier_engine()?;
    let options = SynonymOptions {
        min_score: Some(0.5),
        n: 3,
        ..Default::default()
    };
    let result = engine.resolve_synonyms(&"apple|NOUN".into(), &options)?;
    let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
    assert_eq!(words, vec!["pear", "melon"]);
    Ok(())
}

#[test]
fn it_stops_once_the_top_tier_fills_the_request() -> Result<()> {
    let engine = tier_engine()?;
    let options = SynonymOptions {
        min_score: Some(0.5),
        n: 1,
        ..Default::default()
    };
    let result = engine.resolve_synonyms(&"apple|NOUN".into(), &options)?;
    let words: Vec<&str> = result.iter().map(|m| m.word.as_str()).collect();
    assert_eq!(words, vec!["pear"]);
    Ok(())
}

#[test]
fn it_excludes_compounds_of_the_input_word() -> Result<()> {
    let index = InMemoryIndex::from_entries([
        ("foo|NOUN", vec![1.0, 0.0]),
        ("super_foo|NOUN", vec![0.99, 0.01]),
        ("bar|NOUN", vec![0.8, 0.2]),
    ])?;
    let engine = SenseEngine::new(index);

    let plain = engine.resolve_synonyms(&"foo|NOUN".into(), &SynonymOptions::default())?;
    assert_eq!(plain[0].word, "super foo");

    let reduced = engine.resolve_synonyms(
        &"foo|NOUN".into(),
        &SynonymOptions {
            reduce_compound_nouns: true,
            ..Default::default()
        },
    )?;
    assert!(reduced.iter().all(|m| m.word != "super foo"));
    assert_eq!(reduced[0].word, "bar");
    Ok(())
}

#[test]
fn it_answers_identically_for_repeated_queries() -> Result<()> {
    let engine = fan_engine()?;
    let phrase: PhraseInput = "stone|NOUN".into();
    let options = SynonymOptions::default();
    let first = engine.resolve_synonyms(&phrase, &options)?;
    for _ in 0..3 {
        assert_eq!(engine.resolve_synonyms(&phrase, &options)?, first);
    }
    Ok(())
}

#[test]
fn it_accepts_json_phrase_records() -> Result<()> {
    let engine = tier_engine()?;
    let phrase = PhraseInput::from_json(serde_json::json!({
        "phrase": [{ "wordsense": "apple|NOUN", "required": true }],
        "is_proper": false,
    }))?;
    let result = engine.resolve_synonyms(&phrase, &SynonymOptions::default())?;
    assert_eq!(result[0].word, "pear");
    Ok(())
}
