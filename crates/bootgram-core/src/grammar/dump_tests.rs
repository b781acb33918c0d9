use indoc::indoc;

use crate::test_utils::{TestToken, builder, pass, registry};
use crate::{EMPTY_STRING, ExprTemplate};

#[test]
fn dump_lists_start_rules_first() {
    let mut b = builder();
    b.register_terminal("+", TestToken::Punct('*')).unwrap();
    b.register_rule("Tail", ["plus", "num", "Tail"], pass(1)).unwrap();
    b.register_rule("Tail", [EMPTY_STRING], vec![ExprTemplate::constant(0_i64)])
        .unwrap();
    b.register_rule(
        "Sum",
        ["num", "+", "Tail"],
        vec![
            ExprTemplate::call(
                "Test.Math.add",
                vec![ExprTemplate::variable(0), ExprTemplate::variable(2)],
            ),
            ExprTemplate::variable(0),
        ],
    )
    .unwrap();
    b.set_start("Sum").unwrap();

    let grammar = b.build(&registry()).unwrap();

    assert_eq!(
        grammar.dump(),
        indoc! {"
            Sum : num '+' Tail { static Test.Math.add($0, $2); $0; }
            Tail : plus num Tail { $1; }
            Tail : _empty_string_ { 0; }
        "}
    );
}
