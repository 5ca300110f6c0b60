#[cfg(test)]

mod tests {
    use num::{BigUint, One, ToPrimitive, Zero};
    use regrank::dfa::{CreateDfaError, Dfa};
    use regrank::engine::{CountError, CreateEngineError, RankError, UnrankError};
    use regrank::regex::CompileRegexError;
    use regrank::{att_fst_from_regex, Config, Engine, RegexConfig};

    fn big(value: u64) -> BigUint {
        BigUint::from(value)
    }

    fn engine(pattern: &str, max_len: usize) -> Engine {
        Engine::new(pattern, max_len).unwrap()
    }

    /// Checks the defining identities of the count table through the public
    /// accessors: the length-0 column marks exactly the accepting states, and
    /// every other entry is the sum over the outgoing transitions one length
    /// below.
    fn check_table_identities(dfa: &Dfa) {
        for state in 0..dfa.state_len() as u32 {
            assert_eq!(
                dfa.word_count(state, 0) == &BigUint::one(),
                dfa.is_final(state),
                "word_count(q, 0) must be 1 exactly on accepting states"
            );
            for len in 1..=dfa.max_len() {
                let mut total = BigUint::zero();
                for symbol in 0..dfa.alphabet_len() as u32 {
                    total += dfa.word_count(dfa.next_state(state, symbol), len - 1);
                }
                assert_eq!(
                    &total,
                    dfa.word_count(state, len),
                    "count table recurrence broken at state {} length {}",
                    state,
                    len
                );
            }
        }
    }

    #[test]
    fn single_word_language() {
        let engine = engine("a", 1);
        assert_eq!(engine.count(1, 1).unwrap(), big(1));
        assert_eq!(engine.rank(b"a").unwrap(), big(0));
        assert_eq!(engine.unrank(&big(0), 1).unwrap(), b"a");
        assert_eq!(
            engine.unrank(&big(1), 1),
            Err(UnrankError::IndexOutOfRange),
            "one past the last word must be rejected"
        );
    }

    #[test]
    fn two_alternatives() {
        let engine = engine("a|b", 1);
        assert_eq!(engine.count(1, 1).unwrap(), big(2));
        assert_eq!(engine.rank(b"a").unwrap(), big(0));
        assert_eq!(engine.rank(b"b").unwrap(), big(1));
        assert_eq!(engine.unrank(&big(0), 1).unwrap(), b"a");
        assert_eq!(engine.unrank(&big(1), 1).unwrap(), b"b");
        check_table_identities(&engine.dfa());
    }

    #[test]
    fn repeated_pair() {
        let engine = engine("(ab)+", 6);
        // One word each at lengths 2, 4 and 6, nothing anywhere else.
        assert_eq!(engine.count(0, 6).unwrap(), big(3));
        for len in [2usize, 4, 6] {
            assert_eq!(engine.count(len, len).unwrap(), big(1));
        }
        assert_eq!(engine.count(3, 3).unwrap(), big(0));
        assert_eq!(engine.unrank(&big(0), 4).unwrap(), b"abab");
        assert_eq!(
            engine.unrank(&big(0), 3),
            Err(UnrankError::IndexOutOfRange),
            "a length with no words has nothing to unrank"
        );
        check_table_identities(&engine.dfa());
    }

    #[test]
    fn three_digit_numerals() {
        let engine = engine("[0-9]{3}", 3);
        assert_eq!(engine.count(3, 3).unwrap(), big(1000));
        for i in 0..1000u32 {
            let word = engine.unrank(&BigUint::from(i), 3).unwrap();
            assert_eq!(
                word,
                format!("{:03}", i).into_bytes(),
                "the {}th three-digit word must be its own numeral",
                i
            );
            assert_eq!(
                engine.rank(&word).unwrap(),
                BigUint::from(i),
                "rank must invert unrank at index {}",
                i
            );
        }
        assert_eq!(engine.unrank(&big(1000), 3), Err(UnrankError::IndexOutOfRange));
        assert_eq!(engine.rank(b"1234"), Err(RankError::LengthMismatch));
        check_table_identities(&engine.dfa());
    }

    #[test]
    fn full_byte_class() {
        let engine = engine("^.{5}$", 5);
        // 256^5 words: every byte participates under byte semantics.
        assert_eq!(engine.count(5, 5).unwrap(), big(1_099_511_627_776));
        assert_eq!(engine.rank(b"\x00\x00\x00\x00\x00").unwrap(), big(0));
        assert_eq!(
            engine.rank(b"\xff\xff\xff\xff\xff").unwrap(),
            big(1_099_511_627_775)
        );
        assert_eq!(
            engine.unrank(&big(1_099_511_627_775), 5).unwrap(),
            b"\xff\xff\xff\xff\xff"
        );
    }

    #[test]
    fn words_beyond_length_bound() {
        // The only word of the language is longer than the table, which is
        // legal: the engine just holds an empty slice of the language.
        let engine = engine("a{10}", 3);
        assert_eq!(engine.count(0, 3).unwrap(), big(0));
        assert_eq!(engine.rank(b"a"), Err(RankError::NotInLanguage));
        assert_eq!(engine.rank(b"aaaa"), Err(RankError::LengthMismatch));
        assert_eq!(engine.unrank(&big(0), 3), Err(UnrankError::IndexOutOfRange));
        assert_eq!(
            engine.unrank_variable(&big(0)),
            Err(UnrankError::IndexOutOfRange)
        );
    }

    #[test]
    fn induced_order_is_not_byte_order() {
        let engine = engine("b[ab]", 2);
        let dfa = engine.dfa();
        // 'b' is consumed by the start state, so it gets symbol index 0 and
        // sorts before 'a' in the induced order.
        assert_eq!(dfa.alphabet(), &b"ba"[..]);
        assert_eq!(engine.count(2, 2).unwrap(), big(2));
        assert_eq!(engine.unrank(&big(0), 2).unwrap(), b"bb");
        assert_eq!(engine.unrank(&big(1), 2).unwrap(), b"ba");
        assert_eq!(engine.rank(b"bb").unwrap(), big(0));
        assert_eq!(engine.rank(b"ba").unwrap(), big(1));
        // The start state branches (sparse) while the second state sends both
        // symbols to the accepting state (dense); both paths must agree with
        // the table identities.
        assert!(!dfa.is_dense(dfa.start_state()));
        assert!(dfa.is_dense(dfa.next_state(dfa.start_state(), 0)));
        check_table_identities(&dfa);
    }

    #[test]
    fn unranking_enumerates_in_order() {
        let engine = engine("[ab]c?", 3);
        assert_eq!(engine.count(1, 1).unwrap(), big(2));
        assert_eq!(engine.count(2, 2).unwrap(), big(2));
        assert_eq!(engine.count(3, 3).unwrap(), big(0));
        let dfa = engine.dfa();
        for len in 1..=2usize {
            let total = engine.count(len, len).unwrap().to_u64().unwrap();
            let mut previous: Option<Vec<u32>> = None;
            for i in 0..total {
                let word = engine.unrank(&big(i), len).unwrap();
                assert_eq!(engine.rank(&word).unwrap(), big(i));
                let indices: Vec<u32> = word
                    .iter()
                    .map(|&byte| dfa.symbol_index(byte).unwrap())
                    .collect();
                if let Some(previous) = previous {
                    assert!(
                        previous < indices,
                        "unrank must be strictly increasing in the induced order"
                    );
                }
                previous = Some(indices);
            }
        }
    }

    #[test]
    fn anchors_and_perl_classes() {
        let digits = engine(r"^\d{2}$", 2);
        assert_eq!(digits.count(2, 2).unwrap(), big(100));
        assert_eq!(digits.rank(b"42").unwrap(), big(42));

        let word = engine(r"\bfoo\b", 3);
        assert_eq!(word.count(3, 3).unwrap(), big(1));
        assert_eq!(word.rank(b"foo").unwrap(), big(0));
    }

    #[test]
    fn empty_word_is_ranked() {
        let engine = engine("a*", 2);
        assert_eq!(engine.count(0, 0).unwrap(), big(1));
        assert_eq!(engine.count(0, 2).unwrap(), big(3));
        assert_eq!(engine.rank(b"").unwrap(), big(0));
        assert_eq!(engine.unrank(&big(0), 0).unwrap(), b"");
        assert_eq!(engine.rank_variable(b"a").unwrap(), big(1));
        assert_eq!(engine.unrank_variable(&big(2)).unwrap(), b"aa");
    }

    #[test]
    fn variable_length_roundtrip() {
        let engine = engine("[ab]{1,3}", 3);
        let total = engine.count(0, 3).unwrap();
        assert_eq!(total, big(14));
        let mut last_len = 0;
        for i in 0..14u32 {
            let word = engine.unrank_variable(&BigUint::from(i)).unwrap();
            assert!(
                word.len() >= last_len,
                "the combined enumeration is ordered by length first"
            );
            last_len = word.len();
            assert_eq!(
                engine.rank_variable(&word).unwrap(),
                BigUint::from(i),
                "rank_variable must invert unrank_variable at index {}",
                i
            );
        }
        assert_eq!(
            engine.unrank_variable(&big(14)),
            Err(UnrankError::IndexOutOfRange)
        );
    }

    #[test]
    fn count_rejects_bad_ranges() {
        let engine = engine("[ab]+", 4);
        assert_eq!(engine.count(3, 2), Err(CountError::BadRange));
        assert_eq!(engine.count(0, 5), Err(CountError::BadRange));
        assert_eq!(engine.count(4, 4).unwrap(), big(16));
    }

    #[test]
    fn bytes_outside_the_alphabet() {
        let engine = engine("[ab]+", 3);
        assert_eq!(engine.rank(b"az"), Err(RankError::UnknownSymbol));
        assert_eq!(engine.rank_variable(b"z"), Err(RankError::UnknownSymbol));
    }

    #[test]
    fn word_over_alphabet_but_not_in_language() {
        let engine = engine("ab|cd", 2);
        assert_eq!(engine.rank(b"ac"), Err(RankError::NotInLanguage));
        assert_eq!(engine.rank(b"ab").unwrap(), big(0));
        assert_eq!(engine.rank(b"cd").unwrap(), big(1));
    }

    #[test]
    fn transition_dump_format() {
        let config = RegexConfig {
            max_memory_usage: None,
        };
        let dump = att_fst_from_regex("ab", &config).unwrap();
        assert_eq!(dump, "0\t1\t97\t97\n1\t2\t98\t98\n2\n");
    }

    #[test]
    fn engine_from_handwritten_dump() {
        // Two-way branch re-joining on 'c': "a" at length 1, "ac" and "bc"
        // at length 2. The output column differs from the input on purpose;
        // the loader must ignore it.
        let dump = "0\t1\t97\t0\n0\t2\t98\t0\n1\t3\t99\t0\n2\t3\t99\t0\n3\n1\n";
        let engine = Engine::from_att_fst(dump, 2).unwrap();
        assert_eq!(engine.count(1, 1).unwrap(), big(1));
        assert_eq!(engine.count(2, 2).unwrap(), big(2));
        assert_eq!(engine.rank(b"a").unwrap(), big(0));
        assert_eq!(engine.rank(b"ac").unwrap(), big(0));
        assert_eq!(engine.rank(b"bc").unwrap(), big(1));
        assert_eq!(engine.unrank(&big(1), 2).unwrap(), b"bc");
        check_table_identities(&engine.dfa());
    }

    #[test]
    fn blank_line_terminates_the_dump() {
        let dump = "0\t1\t97\t97\n1\n\nthis is not part of the dump";
        let engine = Engine::from_att_fst(dump, 1).unwrap();
        assert_eq!(engine.rank(b"a").unwrap(), big(0));
    }

    #[test]
    fn malformed_dumps_are_rejected() {
        assert!(matches!(
            Engine::from_att_fst("0\t1\t97", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::InvalidLine(_)))
        ));
        assert!(matches!(
            Engine::from_att_fst("not a number\n", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::InvalidLine(_)))
        ));
        assert!(matches!(
            Engine::from_att_fst("0\t1\t256\t256\n1\n", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::SymbolOutOfRange(256)))
        ));
        // A final state far outside the discovered state range.
        assert!(matches!(
            Engine::from_att_fst("0\t1\t97\t97\n5\n", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::StateOutOfRange(5, _)))
        ));
        // A transition destination beyond every declared state and the sink.
        assert!(matches!(
            Engine::from_att_fst("0\t7\t97\t97\n0\n", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::StateOutOfRange(7, _)))
        ));
        assert!(matches!(
            Engine::from_att_fst("", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::NoTransitions))
        ));
        // A lone final state has no alphabet to rank over.
        assert!(matches!(
            Engine::from_att_fst("0\n", 1),
            Err(CreateEngineError::DfaError(CreateDfaError::NoTransitions))
        ));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(
            Engine::new("(unclosed", 4),
            Err(CreateEngineError::RegexError(CompileRegexError::BadRegex(_)))
        ));
    }

    #[test]
    fn memory_budget_is_enforced() {
        let config = Config {
            regex_config: RegexConfig {
                max_memory_usage: Some(64),
            },
        };
        assert!(matches!(
            Engine::with_config("[a-z]{16,32}", 32, config),
            Err(CreateEngineError::RegexError(
                CompileRegexError::NfaTooLarge(_) | CompileRegexError::DfaTooLarge(_)
            ))
        ));
    }

    #[test]
    fn engines_are_shareable_across_threads() {
        let engine = engine("[0-9a-f]{4}", 4);
        std::thread::scope(|scope| {
            for thread in 0..4u64 {
                let engine = &engine;
                scope.spawn(move || {
                    let mut i = thread;
                    while i < 4096 {
                        let word = engine.unrank(&BigUint::from(i), 4).unwrap();
                        assert_eq!(engine.rank(&word).unwrap(), BigUint::from(i));
                        i += 97;
                    }
                });
            }
        });
    }
}
