//! Scenario tests for the merge engine.

#[cfg(test)]
mod tests {
    use crate::merge::{merge, merge_all, merge_all_with, merge_with};
    use crate::rules::{
        MatchedAction, MergeAction, MergeError, MergeOptions, Placement, SequenceMergeAction,
    };
    use crate::value::{from_json, Value};
    use pretty_assertions::assert_eq;

    /// Test case for rule-driven pairwise merges.
    struct MergeScenario {
        name: &'static str,
        dest: &'static str,
        src: &'static str,
        options: MergeOptions,
        want: &'static str,
    }

    fn run(scenario: MergeScenario) {
        let dest = from_json(scenario.dest)
            .unwrap_or_else(|e| panic!("bad dest for {}: {}", scenario.name, e));
        let src = from_json(scenario.src)
            .unwrap_or_else(|e| panic!("bad src for {}: {}", scenario.name, e));
        let want = from_json(scenario.want)
            .unwrap_or_else(|e| panic!("bad want for {}: {}", scenario.name, e));

        let got = merge_with(dest, src, &scenario.options)
            .unwrap_or_else(|e| panic!("merge failed for {}: {}", scenario.name, e));
        assert_eq!(got, want, "merge mismatch for {}", scenario.name);
    }

    const NESTED_DEST: &str = r#"{
        "prop": {
            "foo": {"name": "foo", "size": 1},
            "bar": [{"name": "bar", "value": [1, 2]}]
        }
    }"#;
    const NESTED_SRC: &str = r#"{
        "prop": {
            "foo": {"name": "FOO", "length": 2},
            "bar": [{"name": "bar", "value": [3]}]
        }
    }"#;

    fn match_by_name() -> SequenceMergeAction {
        SequenceMergeAction::new().match_by(|x, y| {
            x.as_map().and_then(|m| m.get("name")) == y.as_map().and_then(|m| m.get("name"))
        })
    }

    #[test]
    fn test_scalar_destinations_replaced() {
        let src = Value::String("Hello, world!".into());
        for dest in [
            Value::Null,
            Value::Int(1),
            Value::Float(2.5),
            Value::Bool(true),
            Value::String("foobar".into()),
        ] {
            assert_eq!(merge(dest, src.clone()), src);
        }
    }

    #[test]
    fn test_mismatched_shapes_replaced() {
        // Record vs sequence and vice versa: no merging across shapes.
        let record = from_json(r#"{"a": 1}"#).unwrap();
        let list = from_json(r#"[1, 2]"#).unwrap();
        assert_eq!(merge(record.clone(), list.clone()), list);
        assert_eq!(merge(list.clone(), record.clone()), record);
        assert_eq!(merge(record, Value::Int(7)), Value::Int(7));
    }

    #[test]
    fn test_record_merged() {
        run(MergeScenario {
            name: "flat record",
            dest: r#"{"foo": 1, "bar": 2}"#,
            src: r#"{"foo": "Hello, world!"}"#,
            options: MergeOptions::new(),
            want: r#"{"foo": "Hello, world!", "bar": 2}"#,
        });
    }

    #[test]
    fn test_disjoint_records_union() {
        run(MergeScenario {
            name: "disjoint keys",
            dest: r#"{"a": 1, "b": {"x": true}}"#,
            src: r#"{"c": [1], "d": null}"#,
            options: MergeOptions::new(),
            want: r#"{"a": 1, "b": {"x": true}, "c": [1], "d": null}"#,
        });
    }

    #[test]
    fn test_nested_record_merged() {
        let got = merge(
            from_json(NESTED_DEST).unwrap(),
            from_json(NESTED_SRC).unwrap(),
        );
        let foo = got
            .as_map()
            .and_then(|m| m.get("prop"))
            .and_then(|p| p.as_map())
            .and_then(|p| p.get("foo"))
            .expect("prop.foo present");
        assert_eq!(
            foo,
            &from_json(r#"{"name": "FOO", "size": 1, "length": 2}"#).unwrap()
        );
    }

    #[test]
    fn test_nested_record_replaced_with_rule() {
        run(MergeScenario {
            name: "replace rule at prop.foo",
            dest: NESTED_DEST,
            src: NESTED_SRC,
            options: MergeOptions::new().rule("$.prop.foo", MergeAction::Replace),
            // Default sequence merge applies under `bar`: the elements are
            // not equal, so the source element is appended.
            want: r#"{
                "prop": {
                    "foo": {"name": "FOO", "length": 2},
                    "bar": [
                        {"name": "bar", "value": [1, 2]},
                        {"name": "bar", "value": [3]}
                    ]
                }
            }"#,
        });
    }

    #[test]
    fn test_replace_ignores_rules_below() {
        // The destination subtree is discarded without recursion, so a
        // nested rule under the replaced path never fires.
        run(MergeScenario {
            name: "replace shadows nested rule",
            dest: r#"{"prop": {"a": {"keep": 1}, "b": 2}}"#,
            src: r#"{"prop": {"a": {"other": 3}}}"#,
            options: MergeOptions::new()
                .rule("$.prop", MergeAction::Replace)
                .rule("$.prop.a", MergeAction::Merge),
            want: r#"{"prop": {"a": {"other": 3}}}"#,
        });
    }

    #[test]
    fn test_sequence_default_merge() {
        run(MergeScenario {
            name: "default equality match, append",
            dest: r#"[1, 2]"#,
            src: r#"[1, 3]"#,
            options: MergeOptions::new(),
            want: r#"[1, 2, 3]"#,
        });
    }

    #[test]
    fn test_sequence_prepend_placement() {
        run(MergeScenario {
            name: "notMatched prepend",
            dest: r#"[1, 2]"#,
            src: r#"[1, 3]"#,
            options: MergeOptions::new().rule(
                "/",
                SequenceMergeAction::new().not_matched(Placement::Prepend),
            ),
            want: r#"[3, 1, 2]"#,
        });
    }

    #[test]
    fn test_sequence_match_disabled_concatenates() {
        run(MergeScenario {
            name: "match disabled, append",
            dest: r#"[1, 2]"#,
            src: r#"[1, 3]"#,
            options: MergeOptions::new().rule("/", SequenceMergeAction::new().no_match()),
            want: r#"[1, 2, 1, 3]"#,
        });
        run(MergeScenario {
            name: "match disabled, prepend",
            dest: r#"[1, 2]"#,
            src: r#"[1, 3]"#,
            options: MergeOptions::new().rule(
                "/",
                SequenceMergeAction::new()
                    .no_match()
                    .not_matched(Placement::Prepend),
            ),
            want: r#"[1, 3, 1, 2]"#,
        });
    }

    #[test]
    fn test_sequence_custom_match() {
        run(MergeScenario {
            name: "custom match by name",
            dest: NESTED_DEST,
            src: NESTED_SRC,
            options: MergeOptions::new().rule("$.prop.bar", match_by_name()),
            want: r#"{
                "prop": {
                    "foo": {"name": "FOO", "size": 1, "length": 2},
                    "bar": [{"name": "bar", "value": [1, 2, 3]}]
                }
            }"#,
        });
    }

    #[test]
    fn test_sequence_rule_with_glob_pattern() {
        // `**` matches at any depth: same outcome as the exact rule above.
        run(MergeScenario {
            name: "recursive glob",
            dest: NESTED_DEST,
            src: NESTED_SRC,
            options: MergeOptions::new().rule("$.**.bar", match_by_name()),
            want: r#"{
                "prop": {
                    "foo": {"name": "FOO", "size": 1, "length": 2},
                    "bar": [{"name": "bar", "value": [1, 2, 3]}]
                }
            }"#,
        });
    }

    #[test]
    fn test_sequence_matched_replace() {
        run(MergeScenario {
            name: "matched elements replaced verbatim",
            dest: r#"[{"name": "bar", "value": [1, 2]}]"#,
            src: r#"[{"name": "bar", "value": [3]}]"#,
            options: MergeOptions::new()
                .rule("/", match_by_name().matched(MatchedAction::Replace)),
            want: r#"[{"name": "bar", "value": [3]}]"#,
        });
    }

    #[test]
    fn test_sequence_action_matched_field_applies_to_records() {
        // A sequence action resolved at a record path contributes its
        // `matched` field: `replace` discards the record subtree.
        run(MergeScenario {
            name: "sequence action at record path",
            dest: r#"{"prop": {"foo": {"size": 1}}}"#,
            src: r#"{"prop": {"foo": {"length": 2}}}"#,
            options: MergeOptions::new().rule(
                "$.prop.foo",
                SequenceMergeAction::new().matched(MatchedAction::Replace),
            ),
            want: r#"{"prop": {"foo": {"length": 2}}}"#,
        });
    }

    #[test]
    fn test_sequence_scan_sees_prior_insertions() {
        // Each source element is matched against the destination as
        // mutated so far: the second `1` matches the one just appended.
        run(MergeScenario {
            name: "scan over mutated destination",
            dest: r#"[2]"#,
            src: r#"[1, 1, 3]"#,
            options: MergeOptions::new(),
            want: r#"[2, 1, 3]"#,
        });
    }

    #[test]
    fn test_rule_precedence_is_table_order() {
        run(MergeScenario {
            name: "broad rule first",
            dest: r#"{"prop": {"foo": {"size": 1}}}"#,
            src: r#"{"prop": {"foo": {"length": 2}}}"#,
            options: MergeOptions::new()
                .rule("$.prop.*", MergeAction::Replace)
                .rule("$.prop.foo", MergeAction::Merge),
            want: r#"{"prop": {"foo": {"length": 2}}}"#,
        });
        run(MergeScenario {
            name: "specific rule first",
            dest: r#"{"prop": {"foo": {"size": 1}}}"#,
            src: r#"{"prop": {"foo": {"length": 2}}}"#,
            options: MergeOptions::new()
                .rule("$.prop.foo", MergeAction::Merge)
                .rule("$.prop.*", MergeAction::Replace),
            want: r#"{"prop": {"foo": {"size": 1, "length": 2}}}"#,
        });
    }

    #[test]
    fn test_merge_multiple_sources() {
        let values = vec![
            from_json(r#"{"foo": 1, "bar": {"a": 1, "b": 1}}"#).unwrap(),
            from_json(r#"{"foo": 2, "bar": {"a": 2}}"#).unwrap(),
            from_json(r#"{"foo": 3, "bar": {"b": 3}}"#).unwrap(),
        ];
        let merged = merge_all(values).expect("non-empty input");
        assert_eq!(
            merged,
            from_json(r#"{"foo": 3, "bar": {"a": 2, "b": 3}}"#).unwrap()
        );
    }

    #[test]
    fn test_merge_all_empty_and_single() {
        assert_eq!(merge_all(vec![]), None);

        let sole = from_json(r#"{"only": [1, 2]}"#).unwrap();
        assert_eq!(merge_all(vec![sole.clone()]), Some(sole));
    }

    #[test]
    fn test_merge_all_with_rules_across_folds() {
        // One compiled table applies to every fold step.
        let values = vec![
            from_json(r#"{"hosts": ["a"]}"#).unwrap(),
            from_json(r#"{"hosts": ["b"]}"#).unwrap(),
            from_json(r#"{"hosts": ["c"]}"#).unwrap(),
        ];
        let options = MergeOptions::new().rule(
            "$.hosts",
            SequenceMergeAction::new().not_matched(Placement::Prepend),
        );
        let merged = merge_all_with(values, &options).unwrap().unwrap();
        assert_eq!(merged, from_json(r#"{"hosts": ["c", "b", "a"]}"#).unwrap());
    }

    #[test]
    fn test_merge_with_invalid_pattern() {
        let options = MergeOptions::new().rule("$.a[b", MergeAction::Replace);
        let err = merge_with(Value::Null, Value::Null, &options).unwrap_err();
        assert!(matches!(err, MergeError::InvalidPattern { .. }));
    }

    #[test]
    fn test_idempotent_against_empty() {
        let original = from_json(NESTED_DEST).unwrap();
        assert_eq!(
            merge(original.clone(), from_json("{}").unwrap()),
            original
        );

        let list = from_json(r#"[1, {"a": 2}]"#).unwrap();
        assert_eq!(merge(list.clone(), from_json("[]").unwrap()), list);
    }

    #[test]
    fn test_new_keys_appended_in_order() {
        let merged = merge(
            from_json(r#"{"b": 1, "a": 1}"#).unwrap(),
            from_json(r#"{"a": 2, "z": 3, "c": 4}"#).unwrap(),
        );
        // Existing keys keep their position; new keys follow in source
        // order.
        assert_eq!(
            crate::value::to_json(&merged).unwrap(),
            r#"{"b":1,"a":2,"z":3,"c":4}"#
        );
    }

    #[test]
    fn test_webpack_configuration() {
        let base = r#"{
            "module": {
                "rules": [
                    {
                        "test": "\\.scss$",
                        "use": ["css-loader", "sass-loader"]
                    }
                ]
            }
        }"#;
        let extend = r#"{
            "module": {
                "rules": [
                    {
                        "test": "\\.scss$",
                        "use": ["style-loader"]
                    }
                ]
            }
        }"#;
        run(MergeScenario {
            name: "webpack configuration",
            dest: base,
            src: extend,
            options: MergeOptions::new()
                .rule(
                    "$.module.rules",
                    SequenceMergeAction::new()
                        .match_by(|x, y| {
                            x.as_map().and_then(|m| m.get("test"))
                                == y.as_map().and_then(|m| m.get("test"))
                        }),
                )
                .rule(
                    "$.module.rules[].use",
                    SequenceMergeAction::new().not_matched(Placement::Prepend),
                ),
            want: r#"{
                "module": {
                    "rules": [
                        {
                            "test": "\\.scss$",
                            "use": ["style-loader", "css-loader", "sass-loader"]
                        }
                    ]
                }
            }"#,
        });
    }
}
