// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fs;

use chainset::HashCodeStrategy;
use chainset::interpreter::Command;
use chainset::interpreter::Interpreter;
use chainset::interpreter::InterpreterConfig;

fn run(script: &str, config: InterpreterConfig) -> Interpreter<Vec<u8>> {
    let mut interpreter = Interpreter::new(Vec::new(), config);
    interpreter.run_script(script.as_bytes()).unwrap();
    interpreter
}

fn output(interpreter: &Interpreter<Vec<u8>>) -> String {
    String::from_utf8(interpreter.output().clone()).unwrap()
}

fn quiet() -> InterpreterConfig {
    InterpreterConfig::default().with_echo(false)
}

#[test]
fn test_command_tokens() {
    assert_eq!(Command::from_token("hash_code"), Some(Command::HashCode));
    assert_eq!(Command::from_token("rehash"), Some(Command::Rehash));
    assert_eq!(Command::from_token("Find"), None);
    assert_eq!(Command::from_token("delete"), None);
}

#[test]
fn test_echo_and_find() {
    let interpreter = run(
        "resize 7\nPUT Cat dog\nfind cat DOG bird\n",
        InterpreterConfig::default(),
    );
    assert_eq!(
        output(&interpreter),
        "resize 7\nPUT Cat dog\nfind cat DOG bird\ncat: found 5\ndog: found 5\nbird: not found\n"
    );
}

#[test]
fn test_check_reports_misspelled_words() {
    let interpreter = run("resize 7\nput cat\ncheck cat dgo\ncheck\n", quiet());
    assert_eq!(output(&interpreter), "misspelled:\tdgo\nmisspelled:\n");
}

#[test]
fn test_print_and_stats() {
    let interpreter = run("resize 3\nput a b c d\nprint\nstats\n", quiet());
    assert_eq!(
        output(&interpreter),
        "0:\tb\t\n1:\tc\t\n2:\ta\td\t\n\
         size:\t\t\t3\ninserts:\t\t4\nload factor:\t1.33333\ncollisions:\t\t1\nmax. bucket:\t2\n"
    );
}

#[test]
fn test_erase_and_hash_code() {
    let interpreter = run(
        "resize 10\nput dog\nhash_code POLY\nfind dog\nrehash\nfind dog\nerase dog\nfind dog\n",
        quiet(),
    );
    assert_eq!(interpreter.table().strategy(), HashCodeStrategy::Polynomial);
    assert_eq!(
        output(&interpreter),
        "dog: not found\ndog: found 9\ndog: not found\n"
    );
}

#[test]
fn test_unknown_strategy_keeps_current() {
    let interpreter = run("hash_code cyclic\nhash_code sha1\n", quiet());
    assert_eq!(interpreter.table().strategy(), HashCodeStrategy::Cyclic);
}

#[test]
fn test_failed_commands_do_not_abort() {
    let interpreter = run(
        "put early\nfind early\nstats\nresize abc\nresize 0\nresize 5\nput late\nfind late\nfrobnicate\n\n",
        quiet(),
    );
    assert_eq!(interpreter.table().bucket_count(), 5);
    assert_eq!(interpreter.table().len(), 1);
    assert_eq!(output(&interpreter), "late: found 4\n");
}

#[test]
fn test_script_with_invalid_utf8() {
    let mut interpreter = Interpreter::new(Vec::new(), quiet());
    interpreter
        .run_script(&b"resize 5\r\nput caf\xe9\nput dog\nfind dog\n"[..])
        .unwrap();
    assert_eq!(interpreter.table().len(), 2);
    assert_eq!(output(&interpreter), "dog: found 0\n");
}

#[test]
fn test_oversized_resize_does_not_abort() {
    let interpreter = run(
        "resize 5\nput cat\nresize 99999999999999\nresize 18446744073709551615\nfind cat\n",
        quiet(),
    );
    assert_eq!(interpreter.table().bucket_count(), 5);
    assert_eq!(output(&interpreter), "cat: found 1\n");
}

#[test]
fn test_load_from_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "Apple\nbanana\r\ncherry \n").unwrap();

    let config = quiet().with_base_dir(dir.path());
    let interpreter = run(
        "resize 11\nload words.txt missing.txt\ncheck apple banana cherry durian\n",
        config,
    );
    assert_eq!(interpreter.table().len(), 3);
    assert_eq!(
        output(&interpreter),
        "Cannot open file missing.txt\nmisspelled:\tdurian\n"
    );
}
