//! End-to-end tests over a small WALS-shaped dataset on disk.

use tempfile::TempDir;
use wals_typology::{
    Encoding, FeaturePositionMap, ScanningValues, ValueSource, Wals, WalsConfig, WalsError,
};

const CODES: &str = "\
ID,Parameter_ID,Name,Description,Number,icon
81A-1,81A,SOV,Subject-object-verb,1,cc00000
81A-2,81A,SVO,Subject-verb-object,2,c0000dd
81A-3,81A,VSO,Verb-subject-object,3,c009900
81A-4,81A,VOS,Verb-object-subject,4,c990099
81A-5,81A,OVS,Object-verb-subject,5,cffff00
81A-6,81A,OSV,Object-subject-verb,6,cff6600
81A-7,81A,No dominant order,Lacking a dominant word order,7,cffffff
87A-1,87A,Adjective-Noun,Modifying adjective precedes noun,1,c0000dd
87A-2,87A,Noun-Adjective,Modifying adjective follows noun,2,cdd0000
20A-1,20A,Exclusively concatenative,Exclusively concatenative,1,cffffff
20A-2,20A,Isolating,Exclusively isolating,2,cdd0000
";

const LANGUAGES: &str = "\
ID,Name,Macroarea,Latitude,Longitude,Glottocode,ISO639P3code,Family,Subfamily,Genus,Samples_100
eng,English,Eurasia,52,0,stan1293,eng,Indo-European,Germanic,Germanic,True
jpn,Japanese,Eurasia,37,140,nucl1643,jpn,Japanese,,Japanese,True
iri,Irish,Eurasia,53,-8,iris1253,gle,Indo-European,Celtic,Celtic,True
";

const VALUES: &str = "\
ID,Language_ID,Parameter_ID,Value,Code_ID,Comment,Source
81A-eng,eng,81A,2,81A-2,,
87A-eng,eng,87A,1,87A-1,,
81A-jpn,jpn,81A,1,81A-1,,
87A-jpn,jpn,87A,1,87A-1,,
20A-jpn,jpn,20A,1,20A-1,,
81A-iri,iri,81A,3,81A-3,,
";

fn dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("codes.csv"), CODES).unwrap();
    std::fs::write(dir.path().join("languages.csv"), LANGUAGES).unwrap();
    std::fs::write(dir.path().join("values.csv"), VALUES).unwrap();
    dir
}

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_catalog_max_values() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    let catalog = wals.feature_description();

    for parameter in catalog.parameters() {
        let max_suffix = parameter
            .codes()
            .filter_map(|c| wals_typology::catalog::split_code_id(&c.id))
            .map(|(_, n)| n)
            .max()
            .unwrap();
        assert_eq!(parameter.max_value(), max_suffix, "{}", parameter.id());
    }
    assert_eq!(catalog.max_value("81A"), Some(7));
    assert_eq!(catalog.description("87A-2"), Some("Modifying adjective follows noun"));
}

#[test]
fn test_word_order_example() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    let only_81a = strings(&["81A"]);

    let categorical = wals
        .feature_vector(None, Some(only_81a.as_slice()), Encoding::Categorical)
        .unwrap();
    let vector = wals
        .language_vector("eng", Some(&categorical), Encoding::Categorical)
        .unwrap();
    assert_eq!(vector.as_slice(), &[2]);

    let one_hot = wals
        .feature_vector(None, Some(only_81a.as_slice()), Encoding::OneHot)
        .unwrap();
    assert_eq!(
        one_hot.features(),
        &["81A-1", "81A-2", "81A-3", "81A-4", "81A-5", "81A-6", "81A-7"]
    );
    let vector = wals
        .language_vector("eng", Some(&one_hot), Encoding::OneHot)
        .unwrap();
    assert_eq!(vector.as_slice(), &[0, 1, 0, 0, 0, 0, 0]);
}

#[test]
fn test_categorical_and_one_hot_agree() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    let categorical = wals.feature_vector(None, None, Encoding::Categorical).unwrap();
    let one_hot = wals.feature_vector(None, None, Encoding::OneHot).unwrap();

    for language in ["eng", "jpn", "iri"] {
        let values = wals
            .language_vector(language, Some(&categorical), Encoding::Categorical)
            .unwrap();
        let bits = wals
            .language_vector(language, Some(&one_hot), Encoding::OneHot)
            .unwrap();

        for (idx, parameter) in categorical.iter() {
            let observed = values[idx];
            let max = wals.feature_description().max_value(parameter).unwrap();
            for n in 1..=max {
                let code = format!("{parameter}-{n}");
                let expected = i64::from(observed == i64::from(n));
                assert_eq!(bits.value_of(&one_hot, &code), Some(expected), "{language} {code}");
            }
        }
    }
}

#[test]
fn test_missing_data_is_zero() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    // English has no 20A observation.
    let vector = wals.language_vector("eng", None, Encoding::Categorical).unwrap();
    let layout = wals.feature_vector(None, None, Encoding::Categorical).unwrap();
    assert_eq!(layout.features(), &["81A", "87A", "20A"]);
    assert_eq!(vector.as_slice(), &[2, 1, 0]);

    let vector = wals.language_vector("eng", None, Encoding::OneHot).unwrap();
    assert_eq!(vector.len(), 7 + 2 + 2);
    assert_eq!(&vector.as_slice()[9..], &[0, 0]);
}

#[test]
fn test_one_hot_length_is_sum_of_max_values() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    let parameters = strings(&["87A", "81A"]);
    let layout = wals
        .feature_vector(None, Some(parameters.as_slice()), Encoding::OneHot)
        .unwrap();
    assert_eq!(layout.len(), 2 + 7);
    assert_eq!(layout.feature(0), Some("87A-1"));
    assert_eq!(layout.feature(2), Some("81A-1"));
}

#[test]
fn test_syntactic_one_hot_requires_catalog_entries() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    // The fixture catalog only covers a few syntactic parameters.
    let err = wals
        .feature_vector(Some("syntactic"), None, Encoding::OneHot)
        .unwrap_err();
    assert!(matches!(err, WalsError::UnknownFeature(_)));

    let layout = wals
        .feature_vector(Some("syntactic"), None, Encoding::Categorical)
        .unwrap();
    assert_eq!(layout.len(), wals.predefined_feature_set("syntactic").unwrap().len());
    let vector = wals.language_vector("jpn", Some(&layout), Encoding::Categorical).unwrap();
    assert_eq!(vector.value_of(&layout, "81A"), Some(1));
    assert_eq!(vector.value_of(&layout, "87A"), Some(1));
    assert_eq!(vector.value_of(&layout, "82A"), Some(0));
}

#[test]
fn test_language_info() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();

    let by_name = wals.language_info(None, Some("English")).unwrap().unwrap();
    let by_lower = wals.language_info(None, Some("english")).unwrap().unwrap();
    assert_eq!(by_name.record, by_lower.record);
    assert!(!by_name.is_ambiguous());

    let irish = wals.language_info(Some("gle"), None).unwrap().unwrap();
    assert_eq!(irish.record.name, "Irish");
    assert_eq!(irish.record.subfamily, "Celtic");

    assert!(wals.language_info(Some("zzz-unknown"), None).unwrap().is_none());
    assert!(matches!(
        wals.language_info(None, None),
        Err(WalsError::InvalidArgument(_))
    ));
}

#[test]
fn test_language_record_serializes() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    let record = wals.languages().by_iso("jpn").unwrap();
    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["name"], "Japanese");
    assert_eq!(json["macroarea"], "Eurasia");
    assert_eq!(json["subfamily"], "");
}

#[test]
fn test_indexed_and_scanning_agree() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    let indexed = wals.indexed().unwrap();
    let scanning = ScanningValues::new(dir.path().join("values.csv"));

    for encoding in [Encoding::Categorical, Encoding::OneHot] {
        let layout = wals.feature_vector(None, None, encoding).unwrap();
        for language in ["eng", "jpn", "iri", "nobody"] {
            assert_eq!(
                indexed.language_vector(language, &layout, encoding).unwrap(),
                scanning.language_vector(language, &layout, encoding).unwrap(),
            );
            assert_eq!(
                wals.language_vector_from(&indexed, language, None, encoding)
                    .unwrap(),
                wals.language_vector(language, None, encoding).unwrap(),
            );
        }
    }
}

#[test]
fn test_out_of_range_value_is_ignored() {
    let dir = dataset();
    std::fs::write(
        dir.path().join("values.csv"),
        "Language_ID,Parameter_ID,Value\neng,87A,9\n",
    )
    .unwrap();
    let wals = Wals::open(dir.path()).unwrap();
    let layout = FeaturePositionMap::from(
        wals.feature_set(None, Some(strings(&["87A"]).as_slice()), Encoding::OneHot)
            .unwrap(),
    );
    let vector = wals.language_vector("eng", Some(&layout), Encoding::OneHot).unwrap();
    assert_eq!(vector.as_slice(), &[0, 0]);
}

#[test]
fn test_iso_code_reads_values_under_wals_id() {
    let dir = dataset();
    let wals = Wals::open(dir.path()).unwrap();
    // Irish is `gle` in ISO 639-3 but `iri` in the values table.
    let by_iso = wals.language_vector("gle", None, Encoding::Categorical).unwrap();
    let by_wals_id = wals.language_vector("iri", None, Encoding::Categorical).unwrap();
    assert_eq!(by_iso.as_slice(), &[3, 0, 0]);
    assert_eq!(by_iso, by_wals_id);

    let irish = wals.language_info(Some("gle"), None).unwrap().unwrap();
    let by_record = wals
        .language_vector_for(irish.record, None, Encoding::Categorical)
        .unwrap();
    assert_eq!(by_record, by_iso);

    let indexed = wals.indexed().unwrap();
    for encoding in [Encoding::Categorical, Encoding::OneHot] {
        assert_eq!(
            wals.language_vector_from(&indexed, "gle", None, encoding).unwrap(),
            wals.language_vector("iri", None, encoding).unwrap(),
        );
    }
}

#[test]
fn test_missing_tables() {
    let dir = dataset();
    std::fs::remove_file(dir.path().join("values.csv")).unwrap();
    assert!(matches!(
        Wals::open(dir.path()),
        Err(WalsError::MissingFile { .. })
    ));

    let empty = TempDir::new().unwrap();
    assert!(matches!(
        Wals::open(empty.path()),
        Err(WalsError::MissingFile { .. })
    ));
}

#[test]
fn test_config_file_names() {
    let dir = dataset();
    std::fs::rename(
        dir.path().join("values.csv"),
        dir.path().join("values-v2020.csv"),
    )
    .unwrap();

    let mut config = WalsConfig::with_data_dir(dir.path());
    config.data.values = "values-v2020.csv".to_string();
    let wals = Wals::from_config(&config).unwrap();
    let vector = wals.language_vector("iri", None, Encoding::Categorical).unwrap();
    assert_eq!(vector.as_slice(), &[3, 0, 0]);
}

#[test]
fn test_missing_column_reported() {
    let dir = dataset();
    std::fs::write(dir.path().join("codes.csv"), "ID,Description\n81A-1,SOV\n").unwrap();
    let err = Wals::open(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        WalsError::MissingColumn {
            column: "Parameter_ID",
            ..
        }
    ));
}

#[test]
fn test_discover_from_project_config() {
    if std::env::var_os(wals_typology::config::DATA_DIR_ENV).is_some() {
        return;
    }
    let data = dataset();
    let project = TempDir::new().unwrap();
    let config_dir = project.path().join(".wals");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[data]\ndir = {:?}\n", data.path().display().to_string()),
    )
    .unwrap();

    let wals = Wals::discover(project.path()).unwrap();
    assert_eq!(wals.languages().len(), 3);
}
