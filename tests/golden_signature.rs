use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use sigletter::signature::{AuthoringSurface, PenConfig, SignatureState};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn draw(surface: &mut AuthoringSurface, from: (f64, f64), to: (f64, f64)) -> sigletter::StrokeBatch {
    surface.pointer_down(from.0, from.1);
    surface.pointer_move(to.0, to.1);
    surface.pointer_up().expect("stroke captured")
}

#[test]
fn golden_two_strokes_across_resize() {
    let mut surface = AuthoringSurface::new(300.0, PenConfig::default()).unwrap();
    let mut state = SignatureState::new();
    state = state.apply_stroke(&draw(&mut surface, (10.0, 10.0), (20.0, 20.0)));
    surface.resize(150.0).unwrap();
    state = state.apply_stroke(&draw(&mut surface, (5.0, 5.0), (50.0, 50.0)));

    let svg = state.document().unwrap().to_svg();
    let digest = hex::encode(Sha256::digest(svg.as_bytes()));

    let expected_path = golden_path("two_strokes.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        fs::write(golden_path("two_strokes.svg"), &svg).expect("write golden svg");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    if expected.trim() != digest {
        let reference = fs::read_to_string(golden_path("two_strokes.svg")).unwrap_or_default();
        panic!("signature drifted from golden\nexpected: {}\nactual:   {}", reference, svg);
    }
}
