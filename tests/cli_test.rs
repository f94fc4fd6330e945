use assert_cmd::prelude::*;
use std::process::Command;
type STDRESULT = Result<(), Box<dyn std::error::Error>>;

fn write_color_sets(path: &std::path::Path, sets: &[Vec<u32>]) {
    let mut buf = Vec::new();
    for s in sets {
        buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
        for &x in s {
            buf.extend_from_slice(&x.to_le_bytes());
        }
    }
    std::fs::write(path, buf).expect("write fixture");
}

/// Full pipeline: sort-asc, find-parents, build, then extract every
/// index and confirm the decoded sets are exactly the input sets (as a
/// multiset, since layout assigns HCS indices independently of input
/// order).
#[test]
fn full_pipeline_round_trips() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let unsorted_path = temp_dir.path().join("colors.bin");
    let sorted_path = temp_dir.path().join("colors.sorted.bin");
    let parents_path = temp_dir.path().join("parents.bin");
    let hcs_path = temp_dir.path().join("colors.hcs");

    let input_sets = vec![
        vec![0u32, 1, 3, 4],
        vec![3u32],
        vec![1u32, 3],
        vec![100_000u32, 200_000],
    ];
    write_color_sets(&unsorted_path, &input_sets);

    Command::cargo_bin("hcs")?
        .arg("sort-asc")
        .arg("-i").arg(&unsorted_path)
        .arg("-o").arg(&sorted_path)
        .assert()
        .success();

    Command::cargo_bin("hcs")?
        .arg("find-parents")
        .arg("-i").arg(&sorted_path)
        .arg("-o").arg(&parents_path)
        .assert()
        .success();

    Command::cargo_bin("hcs")?
        .arg("build")
        .arg("-s").arg(&sorted_path)
        .arg("-p").arg(&parents_path)
        .arg("-d").arg("1000000")
        .arg("-o").arg(&hcs_path)
        .assert()
        .success();

    let mut expected: Vec<String> = input_sets.iter().map(|s| format!("{s:?}")).collect();
    expected.sort();

    let mut actual = Vec::new();
    for i in 0..input_sets.len() {
        let out = Command::cargo_bin("hcs")?
            .arg("extract")
            .arg("-i").arg(&hcs_path)
            .arg("-n").arg(i.to_string())
            .output()?;
        assert!(out.status.success());
        actual.push(String::from_utf8(out.stdout)?.trim().to_string());
    }
    actual.sort();

    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn extract_out_of_range_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let sorted_path = temp_dir.path().join("colors.sorted.bin");
    let parents_path = temp_dir.path().join("parents.bin");
    let hcs_path = temp_dir.path().join("colors.hcs");

    write_color_sets(&sorted_path, &[vec![1u32]]);

    Command::cargo_bin("hcs")?
        .arg("find-parents")
        .arg("-i").arg(&sorted_path)
        .arg("-o").arg(&parents_path)
        .assert()
        .success();

    Command::cargo_bin("hcs")?
        .arg("build")
        .arg("-s").arg(&sorted_path)
        .arg("-p").arg(&parents_path)
        .arg("-d").arg("10")
        .arg("-o").arg(&hcs_path)
        .assert()
        .success();

    Command::cargo_bin("hcs")?
        .arg("extract")
        .arg("-i").arg(&hcs_path)
        .arg("-n").arg("5")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn bench_runs_to_completion() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let sorted_path = temp_dir.path().join("colors.sorted.bin");
    let parents_path = temp_dir.path().join("parents.bin");
    let hcs_path = temp_dir.path().join("colors.hcs");

    write_color_sets(&sorted_path, &[vec![1u32], vec![1u32, 2], vec![1u32, 2, 3]]);

    Command::cargo_bin("hcs")?
        .arg("find-parents")
        .arg("-i").arg(&sorted_path)
        .arg("-o").arg(&parents_path)
        .assert()
        .success();

    Command::cargo_bin("hcs")?
        .arg("build")
        .arg("-s").arg(&sorted_path)
        .arg("-p").arg(&parents_path)
        .arg("-d").arg("10")
        .arg("-o").arg(&hcs_path)
        .assert()
        .success();

    Command::cargo_bin("hcs")?
        .arg("bench")
        .arg("-i").arg(&hcs_path)
        .arg("-n").arg("50")
        .assert()
        .success();
    Ok(())
}
