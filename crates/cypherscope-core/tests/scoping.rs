mod common;

use common::editor_at;
use rstest::rstest;

#[rstest]
#[case::variable_across_clauses("MATCH (▼n) WHERE n.age > 1 RETURN n", "n", 3)]
#[case::label_within_statement("MATCH (a:▼Person) MATCH (b:Person)", "Person", 2)]
#[case::label_split_by_semicolon("MATCH (a:▼Person); MATCH (b:Person)", "Person", 1)]
#[case::relationship_type("MATCH ()-[:▼KNOWS]->(); MATCH ()-[:KNOWS]->()", "KNOWS", 1)]
#[case::property_key("MATCH (n) WHERE n.▼age > 1 RETURN n.age", "age", 2)]
#[case::parameter("RETURN $▼p + $p", "p", 2)]
#[case::function_name("RETURN to▼Float('1') + toFloat('2')", "toFloat", 2)]
#[case::console_command(":pl▼ay movies", ":play", 1)]
fn references_stay_inside_their_statement(
    #[case] fixture: &str,
    #[case] name: &str,
    #[case] expected: usize,
) {
    let (editor, line, column) = editor_at(fixture);
    let references = editor.references_at(line, column);
    assert_eq!(references.len(), expected, "fixture: {fixture}");
    assert!(references.iter().all(|r| r.name == name));
}

#[test]
fn identical_statements_do_not_share_references() {
    let (editor, line, column) = editor_at("MATCH (▼n:Label); MATCH (n:Label);");
    let references = editor.references_at(line, column);
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].range.start.offset, 7);

    // Same query against the second statement's occurrence.
    let (editor, _, _) = editor_at("MATCH (n:Label); MATCH (n:Label);▼");
    let references = editor.references_at(1, 25);
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].range.start.offset, 24);
}

#[test]
fn keywords_and_open_space_have_no_references() {
    let (editor, line, column) = editor_at("MA▼TCH (n) RETURN n");
    assert!(editor.references_at(line, column).is_empty());
    assert!(editor.references_at(1, 10).is_empty());
}

#[test]
fn reference_ranges_point_at_the_occurrences() {
    let (editor, line, column) = editor_at("MATCH (movie:Film) RETURN ▼movie");
    let references = editor.references_at(line, column);
    assert_eq!(references.len(), 2);
    assert_eq!(references[0].range.start.offset, 7);
    assert_eq!(references[0].range.stop.offset, 11);
    assert_eq!(references[1].range.start.offset, 26);
}

#[test]
fn parameter_reference_spans_the_bare_name() {
    let (editor, line, column) = editor_at("RETURN $▼param;");
    let references = editor.references_at(line, column);
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].name, "param");
    assert_eq!(references[0].range.start.offset, 8);
    assert_eq!(references[0].range.stop.offset, 12);
}

#[test]
fn statement_separator_keeps_trailing_trivia_out_of_buckets() {
    let (editor, _, _) = editor_at("RETURN 1;  ▼RETURN 2");
    let statements = editor.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].range.start.offset, 0);
    assert_eq!(statements[0].range.stop.offset, 8);
    assert_eq!(statements[1].range.start.offset, 11);
}
