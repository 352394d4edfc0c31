use gherkin_listener::{Record, TrailingBlock, parse};
use proptest::prelude::*;

fn records(source: &str) -> Vec<Record> {
    let mut records = Vec::new();
    parse(source, &mut records).unwrap();
    records
}

fn cell() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,6}"
}

fn table() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..5).prop_flat_map(|columns| {
        prop::collection::vec(prop::collection::vec(cell(), columns), 1..6)
    })
}

proptest! {
    #[test]
    fn comments_and_tags_attach_to_next_element(comments in 0usize..4, tags in 0usize..4) {
        let mut source = String::from("Feature: F\n");
        for i in 0..comments {
            source.push_str(&format!("  # note {i}\n"));
        }
        for i in 0..tags {
            source.push_str(&format!("  @t{i}\n"));
        }
        source.push_str("  Scenario: S\n    Given x\n");

        let records = records(&source);
        prop_assert_eq!(records.len(), 4);
        let Record::Feature(feature) = &records[0] else {
            panic!("expected a feature, got {:?}", records[0]);
        };
        prop_assert!(feature.comments.is_empty());
        prop_assert!(feature.tags.is_empty());

        let Record::Scenario(scenario) = &records[1] else {
            panic!("expected a scenario, got {:?}", records[1]);
        };
        let expected_comments: Vec<String> = (0..comments).map(|i| format!("note {i}")).collect();
        let expected_tags: Vec<String> = (0..tags).map(|i| format!("@t{i}")).collect();
        prop_assert_eq!(&scenario.comments, &expected_comments);
        prop_assert_eq!(&scenario.tags, &expected_tags);
        prop_assert_eq!(scenario.line, 2 + comments + tags);
    }

    #[test]
    fn tables_keep_their_shape(rows in table()) {
        let mut source = String::from("Feature: F\nScenario: S\nGiven a table\n");
        for row in &rows {
            source.push('|');
            for cell in row {
                source.push_str(&format!(" {cell} |"));
            }
            source.push('\n');
        }

        let records = records(&source);
        let Record::Step(step) = &records[2] else {
            panic!("expected a step, got {:?}", records[2]);
        };
        let Some(TrailingBlock::Table(table)) = &step.block else {
            panic!("expected a table, got {:?}", step.block);
        };
        prop_assert_eq!(table.len(), rows.len());
        for (i, (row, expected)) in table.iter().zip(&rows).enumerate() {
            prop_assert_eq!(row.line, 4 + i);
            prop_assert!(row.comments.is_empty());
            prop_assert_eq!(&row.cells, expected);
        }
        prop_assert_eq!(&records[3], &Record::Eof);
    }

    #[test]
    fn text_blocks_round_trip_their_lines(lines in prop::collection::vec("[a-z ]{0,12}", 0..5)) {
        let mut source = String::from("Feature: F\nScenario: S\nGiven a doc\n  \"\"\"\n");
        for line in &lines {
            source.push_str(&format!("  {line}\n"));
        }
        source.push_str("  \"\"\"\n");

        let records = records(&source);
        let Record::Step(step) = &records[2] else {
            panic!("expected a step, got {:?}", records[2]);
        };
        prop_assert_eq!(step.block.clone(), Some(TrailingBlock::TextBlock(lines.join("\n"))));
    }
}
