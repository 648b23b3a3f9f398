//! End-to-end convergence tests over a realistic mirrored page.
//!
//! Exercises the full pass the way the watch loop runs it: parse the
//! mirror, patch, serialize, write-only-if-changed, and converge no matter
//! how often the vendor pipeline rewrites the files.

use std::time::Duration;

use reclaim::config::{PatchConfig, TimingConfig};
use reclaim::dom::{parse_document, serialize};
use reclaim::patch::Patcher;
use reclaim::reconcile::Reconciler;
use reclaim::site::{MirrorSite, PassMode};

/// A trimmed-down version of the vendor's exported homepage: badge, promo
/// strip, footer credits, placeholder hero, and the four contact cards.
const MIRRORED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Landon Aguirre · Independent Visual Designer</title>
<meta name="description" content="Landon Aguirre is an independent visual designer.">
<meta property="og:title" content="Landon Aguirre">
<meta property="og:description" content="Visual designer portfolio">
<meta name="twitter:title" content="Landon Aguirre">
<meta name="twitter:description" content="Visual designer portfolio">
<meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
<div data-framer-appear-id="promo1">
<a href="https://www.framer.com/@bryn-taylor/?via=x">A minimal portfolio template · View all templates</a>
</div>
<header data-framer-name="Section / Header">
<h1>I'm an AI-focused software engineer. Based in Atlanta, GA.</h1>
</header>
<main>
<p>About Landon: Landon Aguirre is an Independent Visual Designer.</p>
<p>Skills: Interface design, Design systems, Brand identity.</p>
<section class="contact">
<div class="card"><a href="mailto:hi@email.com" target="_blank"><h3>Email</h3><h4>hi@email.com</h4></a></div>
<div class="card"><a href="https://dribbble.com/bryntaylor"><h3>Dribbble</h3><h4>landonaguirre</h4></a></div>
<div class="card"><a href="https://linkedin.com/in/bryntaylor"><h3>LinkedIn</h3><h4>landonaguirre</h4></a></div>
<div class="card"><a href="https://twitter.com/bryntaylor99"><h3>Twitter</h3><h4>@twitterhandle</h4></a></div>
</section>
<div class="note"><h4>office hours @ studio, weekdays</h4></div>
<script>var template = "Visual designer";</script>
</main>
<footer>
<div class="framer-u1lq9q-container">
<div data-framer-appear-id="credit1"><a href="https://www.framer.com?via=bryn">Made in Framer</a></div>
</div>
<div class="framer-x8ttbq-container">
<a href="https://www.bryntaylor.co.uk/templates">Unlimited Access templates</a>
</div>
</footer>
<div id="__framer-badge-container"><a href="https://framer.com">Framer</a></div>
</body>
</html>
"#;

fn patcher() -> Patcher {
    Patcher::new(PatchConfig::default())
}

#[test]
fn full_pass_converges_the_mirrored_page() {
    let mut dom = parse_document(MIRRORED_PAGE);
    let report = patcher().run(&mut dom);
    assert!(report.changed());
    assert_eq!(report.badges_removed, 1);
    assert_eq!(report.promos_removed, 1);
    assert_eq!(report.credits_removed, 2);
    assert!(report.hero_rewritten);

    let html = serialize(&dom);

    // Vendor chrome is gone, wrappers included.
    assert!(!html.contains("__framer-badge-container"));
    assert!(!html.contains("View all templates"));
    assert!(!html.contains("Made in Framer"));
    assert!(!html.contains("Unlimited Access templates"));
    assert!(!html.contains("framer-u1lq9q-container"));

    // Placeholder identity is replaced everywhere visible.
    assert!(!html.contains("Landon Aguirre"));
    assert!(html.contains("About Yousuf"));
    assert!(html.contains("Yousuf Bukhari"));
    assert!(html.contains("Machine learning, AI Engineering, AI Engineering."));

    // Hero converged to the canonical bio.
    assert!(html.contains("I build LLM-powered features, ML pipelines"));

    // Contact cards are canonical. The text pass renames the Dribbble card
    // to GitHub, then the link pass heals its target.
    assert!(html.contains("href=\"https://github.com/youpesh\""));
    assert!(html.contains("<h4>youpesh</h4>"));
    assert!(html.contains("href=\"https://www.linkedin.com/in/yousuf-bukhari/\""));
    assert!(html.contains("<h4>yousuf-bukhari</h4>"));
    assert!(html.contains("href=\"https://x.com/youssef_bukhari\""));
    assert!(html.contains("<h4>@youssef_bukhari</h4>"));
    assert!(!html.contains("dribbble.com"));

    // Email card is copy-only.
    assert!(html.contains("data-copy-email=\"youssefbukhari4@gmail.com\""));
    assert!(!html.contains("mailto:"));
    assert!(!html.contains("target=\"_blank\""));

    // Unrelated "@" text outside a recognized email block is untouched.
    assert!(html.contains("office hours @ studio, weekdays"));

    // Script content is never rewritten.
    assert!(html.contains("var template = \"Visual designer\";"));
}

#[test]
fn meta_and_title_are_patched() {
    let mut dom = parse_document(MIRRORED_PAGE);
    patcher().run(&mut dom);
    let html = serialize(&dom);

    // The title cascades: name and role rules rewrite it first, then the
    // title-stabilization rule matches the text they produced.
    assert!(html.contains("<title>Yousuf Bukhari | AI Software Engineer in Atlanta, GA</title>"));
    assert!(html.contains("Yousuf Bukhari is an AI-focused software engineer."));
    assert!(html.contains("content=\"Software Engineer portfolio\""));
    // Meta tags outside the configured set stay as exported.
    assert!(html.contains("width=device-width, initial-scale=1"));
}

#[test]
fn second_pass_is_a_noop() {
    let patcher = patcher();
    let mut dom = parse_document(MIRRORED_PAGE);
    patcher.run(&mut dom);
    let converged = serialize(&dom);

    let mut dom = parse_document(&converged);
    let report = patcher.run(&mut dom);
    assert!(!report.changed(), "second pass changed: {report:?}");
    assert_eq!(serialize(&dom), converged);
}

#[test]
fn touch_up_subset_still_heals_links() {
    let patcher = patcher();
    let mut dom = parse_document(MIRRORED_PAGE);
    patcher.run(&mut dom);

    // Simulate the vendor pipeline swapping the GitHub card back.
    let converged = serialize(&dom);
    let regressed = converged.replace(
        "https://github.com/youpesh",
        "https://dribbble.com/bryntaylor",
    );
    let mut dom = parse_document(&regressed);
    let report = patcher.touch_up(&mut dom);
    assert!(report.links_fixed >= 1);
    assert!(serialize(&dom).contains("https://github.com/youpesh"));
}

#[test]
fn site_pass_writes_once_then_settles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), MIRRORED_PAGE).unwrap();
    std::fs::create_dir_all(dir.path().join("about")).unwrap();
    std::fs::write(
        dir.path().join("about/index.html"),
        "<html><head><title>Yousuf Bukhari · About</title></head><body><p>About Landon</p></body></html>",
    )
    .unwrap();

    let site = MirrorSite::open(dir.path()).unwrap();
    let patcher = patcher();

    let first = site.patch_all(&patcher, PassMode::Full);
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|o| o.changed));

    let about = std::fs::read_to_string(dir.path().join("about/index.html")).unwrap();
    assert!(about.contains("<title>About | Yousuf Bukhari</title>"));
    assert!(about.contains("About Yousuf"));

    let second = site.patch_all(&patcher, PassMode::Full);
    assert!(second.iter().all(|o| !o.changed));
}

#[tokio::test]
async fn reconciler_keeps_the_mirror_converged() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("index.html");
    std::fs::write(&index, MIRRORED_PAGE).unwrap();

    let timing = TimingConfig {
        scan_interval_ms: 10,
        recheck_delay_ms: 5,
        poll_interval_ms: 20,
        marker_clear_ms: 1200,
    };
    let site = MirrorSite::open(dir.path()).unwrap();
    let reconciler = Reconciler::new(site, patcher(), timing);
    let handle = reconciler.start();

    let converged = |path: &std::path::Path| {
        std::fs::read_to_string(path)
            .map(|s| s.contains("github.com/youpesh") && !s.contains("Landon Aguirre"))
            .unwrap_or(false)
    };

    for _ in 0..200 {
        if converged(&index) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(converged(&index), "initial pass never converged the mirror");

    // The vendor pipeline regenerates the whole file.
    std::fs::write(&index, MIRRORED_PAGE).unwrap();
    for _ in 0..200 {
        if converged(&index) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(converged(&index), "rewrite was never re-patched");

    handle.stop().await;
}
