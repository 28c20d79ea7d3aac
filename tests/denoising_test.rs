use rs_deboiler::{Dataset, Deboiler, ListDataset, Options, OutputPage, PageRecord, Validity};

fn record(url: &str, body: &str) -> PageRecord {
    PageRecord {
        url: url.to_string(),
        content: format!("<html><head><title>Site</title></head><body>{body}</body></html>"),
        status: None,
        content_type: None,
    }
}

fn dataset(records: Vec<PageRecord>) -> ListDataset {
    ListDataset::new(records, Validity::none())
}

fn run(dataset: &ListDataset, options: Options) -> Vec<OutputPage> {
    let mut deboiler = match Deboiler::new(options) {
        Ok(deboiler) => deboiler,
        Err(err) => panic!("construction failed: {err}"),
    };
    if let Err(err) = deboiler.fit(dataset) {
        panic!("fit failed: {err}");
    }
    let iter = match deboiler.transform(dataset, false) {
        Ok(iter) => iter,
        Err(err) => panic!("transform failed: {err}"),
    };
    iter.map(|item| match item {
        Ok(page) => page,
        Err(err) => panic!("page failed: {err}"),
    })
    .collect()
}

const NAV: &str = r#"<nav><a href="/">Home</a><a href="/contact">Contact</a></nav>"#;
const FOOTER: &str = r#"<div class="footer">Copyright 2024 Example Inc</div>"#;

#[test]
fn shared_chrome_is_removed_and_unique_content_kept() {
    let corpus = dataset(vec![
        record(
            "https://example.com/a",
            &format!("{NAV}<div><p>Alpha article body</p></div>{FOOTER}"),
        ),
        record(
            "https://example.com/b",
            &format!("{NAV}<div><p>Beta article body</p></div>{FOOTER}"),
        ),
        record(
            "https://example.com/c",
            &format!("{NAV}<div><p>Gamma article body</p></div>{FOOTER}"),
        ),
    ]);

    let outputs = run(&corpus, Options::default());
    assert_eq!(outputs.len(), 3);
    for output in &outputs {
        assert!(output.text.contains("Home"), "pre-removal text keeps nav");
        assert!(!output.cleaned_text.contains("Home"));
        assert!(!output.cleaned_text.contains("Copyright"));
        assert!(output.cleaned_text.contains("article body"));
    }
}

#[test]
fn outputs_come_back_in_sorted_url_order() {
    let corpus = dataset(vec![
        record("https://example.com/c", &format!("{NAV}<p>c</p>")),
        record("https://example.com/a", &format!("{NAV}<p>a</p>")),
        record("https://example.com/b", &format!("{NAV}<p>b</p>")),
    ]);
    let outputs = run(&corpus, Options::default());
    let urls: Vec<&str> = outputs.iter().map(|output| output.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/c",
        ]
    );
}

#[test]
fn identical_pages_produce_no_boilerplate() {
    let body = format!("{NAV}<p>Same body everywhere</p>");
    let corpus = dataset(vec![
        record("https://example.com/a", &body),
        record("https://example.com/b", &body),
    ]);

    let mut deboiler = match Deboiler::new(Options::default()) {
        Ok(deboiler) => deboiler,
        Err(err) => panic!("construction failed: {err}"),
    };
    if let Err(err) = deboiler.fit(&corpus) {
        panic!("fit failed: {err}");
    }
    assert!(deboiler.boilerplate().is_empty());

    let outputs = run(&corpus, Options::default());
    for output in &outputs {
        assert_eq!(output.text, output.cleaned_text);
    }
}

#[test]
fn single_page_corpus_fits_to_an_empty_set() {
    let corpus = dataset(vec![record("https://example.com/a", "<p>alone</p>")]);
    let mut deboiler = match Deboiler::new(Options::default()) {
        Ok(deboiler) => deboiler,
        Err(err) => panic!("construction failed: {err}"),
    };
    if let Err(err) = deboiler.fit(&corpus) {
        panic!("fit failed: {err}");
    }
    assert!(deboiler.boilerplate().is_empty());

    let outputs = run(&corpus, Options::default());
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].cleaned_text.contains("alone"));
}

#[test]
fn empty_corpus_is_a_no_op() {
    let corpus = dataset(Vec::new());
    assert!(corpus.is_empty());
    let outputs = run(&corpus, Options::default());
    assert!(outputs.is_empty());
}

#[test]
fn min_occurrence_threshold_filters_rare_subtrees() {
    // the promo appears only in the first pair, the nav in both
    let corpus = dataset(vec![
        record(
            "https://example.com/a",
            &format!("{NAV}<div class=\"left\">Seasonal promo</div><div>page a</div>"),
        ),
        record(
            "https://example.com/b",
            &format!("{NAV}<div class=\"left\">Seasonal promo</div><div>page b</div>"),
        ),
        record("https://example.com/c", &format!("{NAV}<div>page c</div>")),
    ]);

    let outputs = run(
        &corpus,
        Options {
            min_occurrence_threshold: 2,
            ..Options::default()
        },
    );
    for output in &outputs {
        assert!(!output.cleaned_text.contains("Home"));
    }
    let first = &outputs[0];
    assert!(first.cleaned_text.contains("Seasonal promo"));
}

#[test]
fn boilerplate_matching_ignores_attribute_differences() {
    // same structure and text, different class and tracking attributes
    let corpus = dataset(vec![
        record(
            "https://example.com/a",
            r#"<nav class="top" data-page="a"><a>Menu</a></nav><div>unique a</div>"#,
        ),
        record(
            "https://example.com/b",
            r#"<nav class="dark" data-page="b"><a>Menu</a></nav><div>unique b</div>"#,
        ),
    ]);
    let outputs = run(&corpus, Options::default());
    for output in &outputs {
        assert!(!output.cleaned_text.contains("Menu"));
        assert!(output.cleaned_text.contains("unique"));
    }
}
