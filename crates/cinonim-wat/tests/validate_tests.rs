//! Generated text must assemble and pass the WebAssembly validator.

use cinonim_ast::{Node, NumericKind};
use cinonim_wat::ast_to_wat;
use wasmparser::Validator;

use NumericKind::*;

fn assert_valid(module: &Node) {
    let text = ast_to_wat(module).unwrap();
    let bytes = match wat::parse_str(&text) {
        Ok(bytes) => bytes,
        Err(e) => panic!("failed to assemble:\n{}\n{}", text, e),
    };
    if let Err(e) = Validator::new().validate_all(&bytes) {
        panic!("invalid module:\n{}\n{}", text, e);
    }
}

fn get(name: &str, ty: NumericKind) -> Node {
    Node::local_get(name, ty)
}

fn binary(lhs: Node, rhs: Node, op: &str, ty: NumericKind) -> Node {
    Node::expr(ty, vec![lhs, rhs, Node::op(op, ty)])
}

fn step(name: &str, op: &str) -> Node {
    Node::local_set(name, binary(get(name, I32), Node::number(I32, "1"), op, I32))
}

#[test]
fn test_globals_validate() {
    assert_valid(&Node::module(vec![
        Node::global_var("foo", F64, "3.14"),
        Node::global_var("bar", I64, "42"),
        Node::global_const("baz", F32, "1.2"),
        Node::global_const("qux", I32, "-7"),
    ]));
}

#[test]
fn test_exported_function_validates() {
    assert_valid(&Node::module(vec![
        Node::export_func("add", "addTwo"),
        Node::function(
            "add",
            I32,
            &[("a", I32), ("b", I32)],
            vec![Node::ret(Some(binary(get("a", I32), get("b", I32), "+", I32)))],
        ),
    ]));
}

#[test]
fn test_early_return_validates() {
    assert_valid(&Node::module(vec![Node::function(
        "absAdd",
        I32,
        &[("a", I32), ("b", I32)],
        vec![
            Node::local_var("sum", I32),
            Node::local_set("sum", binary(get("a", I32), get("b", I32), "+", I32)),
            Node::if_then(
                binary(get("sum", I32), Node::number(I32, "0"), "<", I32),
                vec![Node::ret(Some(binary(
                    Node::number(I32, "0"),
                    get("sum", I32),
                    "-",
                    I32,
                )))],
            ),
            Node::ret(Some(get("sum", I32))),
        ],
    )]));
}

#[test]
fn test_loops_validate() {
    let limit = |name: &str, n: &str| binary(get(name, I32), Node::number(I32, n), "<", I32);
    let skip_odd = Node::if_then(
        binary(
            binary(get("i", I32), Node::number(I32, "2"), "%", I32),
            Node::number(I32, "1"),
            "==",
            I32,
        ),
        vec![Node::cont()],
    );

    assert_valid(&Node::module(vec![
        Node::function(
            "forLoop",
            Void,
            &[("j", I32)],
            vec![
                Node::local_var("i", I32),
                Node::for_loop(
                    vec![Node::local_set("i", Node::number(I32, "0"))],
                    Some(limit("i", "10")),
                    vec![step("i", "+")],
                    vec![skip_odd.clone(), step("j", "+")],
                ),
                Node::for_loop(vec![], None, vec![], vec![Node::brk()]),
            ],
        ),
        Node::function(
            "doLoop",
            I32,
            &[("i", I32)],
            vec![
                Node::do_loop(
                    vec![
                        step("i", "+"),
                        skip_odd,
                        Node::if_then(
                            binary(get("i", I32), Node::number(I32, "8"), "==", I32),
                            vec![Node::ret(Some(get("i", I32)))],
                        ),
                    ],
                    limit("i", "10"),
                ),
                Node::ret(Some(get("i", I32))),
            ],
        ),
        Node::function(
            "nested",
            Void,
            &[("i", I32), ("j", I32)],
            vec![Node::while_loop(
                limit("i", "3"),
                vec![
                    Node::while_loop(
                        limit("j", "3"),
                        vec![
                            step("j", "+"),
                            Node::if_else(
                                binary(get("j", I32), get("i", I32), "==", I32),
                                vec![Node::cont_levels(2)],
                                vec![Node::brk_levels(2)],
                            ),
                        ],
                    ),
                    step("i", "+"),
                ],
            )],
        ),
    ]));
}

#[test]
fn test_typed_conditions_validate() {
    assert_valid(&Node::module(vec![
        Node::global_var("total", F64, "0.0"),
        Node::function(
            "drain",
            Void,
            &[("n", I64), ("x", F32)],
            vec![
                Node::while_loop(
                    get("n", I64),
                    vec![Node::local_set(
                        "n",
                        binary(get("n", I64), Node::number(I64, "1"), "-", I64),
                    )],
                ),
                Node::if_then(
                    get("x", F32),
                    vec![Node::global_set(
                        "total",
                        Node::expr(
                            F64,
                            vec![
                                Node::global_get("total", F64),
                                get("x", F32),
                                Node::cast(F32, F64),
                                Node::op("+", F64),
                            ],
                        ),
                    )],
                ),
                Node::ret(None),
            ],
        ),
    ]));
}

#[test]
fn test_casts_validate() {
    let pairs = [I32, I64, F32, F64];
    let mut functions = Vec::new();
    for (i, from) in pairs.iter().enumerate() {
        for (j, to) in pairs.iter().enumerate() {
            functions.push(Node::function(
                &format!("cast_{}_{}", i, j),
                *to,
                &[("v", *from)],
                vec![Node::ret(Some(Node::expr(
                    *to,
                    vec![get("v", *from), Node::cast(*from, *to)],
                )))],
            ));
        }
    }
    assert_valid(&Node::module(functions));
}
