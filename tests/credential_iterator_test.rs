use rust_cred_iterator::config::{ChunkConfig, EngineConfig, ScanLimits};
use rust_cred_iterator::errors::CredError;
use rust_cred_iterator::iterator::{CredentialIterator, Host, IteratorConfig, Pull};
use rust_cred_iterator::wordlist::StaticWordlists;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

// 测试辅助函数：在临时目录中写入按行的字典文件
fn write_lines(dir: &TempDir, name: &str, lines: &[&str]) -> String {
    let path = dir.path().join(name);
    let mut content = lines.join("\n");
    if !lines.is_empty() {
        content.push('\n');
    }
    std::fs::write(&path, content).expect("Failed to write wordlist");
    path.to_str().unwrap().to_string()
}

fn ssh_host() -> Host {
    Host::new("127.0.0.1", 22, "ssh")
}

fn pairs(iterator: CredentialIterator) -> Vec<(String, String)> {
    iterator.map(|c| (c.username, c.password)).collect()
}

fn owned(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(u, p)| (u.to_string(), p.to_string()))
        .collect()
}

// 测试字面量用户名和密码
#[test]
fn test_standard_literal_pair() {
    let iterator = CredentialIterator::new(ssh_host(), "admin", "secret", "", "", false);
    assert_eq!(pairs(iterator), owned(&[("admin", "secret")]));
}

// 测试文件 x 文件 的笛卡尔积，用户名为外层
#[test]
fn test_standard_files_user_major_order() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &["u1", "u2", "u3"]);
    let passwords = write_lines(&dir, "passwords.txt", &["p1", "p2"]);

    let iterator = CredentialIterator::new(ssh_host(), &users, &passwords, "", "", false);
    assert_eq!(
        pairs(iterator),
        owned(&[
            ("u1", "p1"),
            ("u1", "p2"),
            ("u2", "p1"),
            ("u2", "p2"),
            ("u3", "p1"),
            ("u3", "p2"),
        ])
    );
}

// 测试密码流重置后顺序不变
#[test]
fn test_password_reset_reproduces_order() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &["alice", "bob"]);
    let passwords = write_lines(&dir, "passwords.txt", &["p1", "p2", "p3"]);

    let iterator = CredentialIterator::new(ssh_host(), &users, &passwords, "", "", false);
    let emitted: Vec<String> = iterator.map(|c| c.password).collect();
    assert_eq!(emitted, vec!["p1", "p2", "p3", "p1", "p2", "p3"]);
}

// 测试文件用户名 x 字面量密码
#[test]
fn test_standard_file_users_literal_password() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &["root", "admin"]);

    let iterator = CredentialIterator::new(ssh_host(), &users, "toor", "", "", false);
    assert_eq!(pairs(iterator), owned(&[("root", "toor"), ("admin", "toor")]));
}

// 测试未指定用户名和密码时使用默认字典
#[test]
fn test_default_wordlists() {
    let config = IteratorConfig::new(ssh_host(), "", "", "", "2.0", false)
        .with_wordlists(Arc::new(StaticWordlists::new(["root", "pi"], ["raspberry"])));

    let iterator = CredentialIterator::from_config(config);
    assert_eq!(pairs(iterator), owned(&[("root", "raspberry"), ("pi", "raspberry")]));
}

// 测试空密码策略
#[test]
fn test_use_empty_password() {
    let config = IteratorConfig::new(ssh_host(), "admin", "", "", "", false)
        .with_engine(EngineConfig::default().with_use_empty_password(true))
        .with_wordlists(Arc::new(StaticWordlists::new(["unused"], ["unused"])));

    let iterator = CredentialIterator::from_config(config);
    assert_eq!(pairs(iterator), owned(&[("admin", "")]));
}

// 测试密码文件为空时即使还有用户名也立即结束
#[test]
fn test_empty_password_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &["u1", "u2", "u3"]);
    let passwords = write_lines(&dir, "passwords.txt", &[]);

    let mut iterator = CredentialIterator::new(ssh_host(), &users, &passwords, "", "", false);
    assert!(matches!(iterator.pull(), Pull::Exhausted));
    assert!(iterator.is_done());
    assert!(matches!(iterator.pull(), Pull::Exhausted));
}

// 测试用户名文件为空
#[test]
fn test_empty_user_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &[]);
    let passwords = write_lines(&dir, "passwords.txt", &["p1"]);

    let iterator = CredentialIterator::new(ssh_host(), &users, &passwords, "", "", false);
    assert!(pairs(iterator).is_empty());
}

// 测试空行也是有效的条目
#[test]
fn test_blank_lines_are_entries() {
    let dir = TempDir::new().unwrap();
    let passwords = write_lines(&dir, "passwords.txt", &["a", "", "b"]);

    let iterator = CredentialIterator::new(ssh_host(), "root", &passwords, "", "", false);
    assert_eq!(
        pairs(iterator),
        owned(&[("root", "a"), ("root", ""), ("root", "b")])
    );
}

// 测试只有密码的模式
#[test]
fn test_password_only_mode() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &["ignored1", "ignored2"]);
    let passwords = write_lines(&dir, "passwords.txt", &["public", "private", "cisco"]);

    let host = Host::new("10.0.0.1", 161, "snmp");
    let iterator = CredentialIterator::new(host, &users, &passwords, "", "", true);
    let emitted = pairs(iterator);
    assert_eq!(emitted.len(), 3);
    assert!(emitted.iter().all(|(user, _)| user.is_empty()));
    assert_eq!(
        emitted.into_iter().map(|(_, p)| p).collect::<Vec<_>>(),
        vec!["public", "private", "cisco"]
    );
}

// 测试组合文件跳过格式错误的行
#[test]
fn test_combo_file_skips_malformed_lines() {
    let dir = TempDir::new().unwrap();
    let combo = write_lines(&dir, "combo.txt", &["a:b", "malformed", "c:d"]);

    let iterator = CredentialIterator::new(ssh_host(), "", "", &combo, "", false);
    assert_eq!(pairs(iterator), owned(&[("a", "b"), ("c", "d")]));
}

// 测试组合行只按第一个冒号切分
#[test]
fn test_combo_splits_on_first_colon() {
    let dir = TempDir::new().unwrap();
    let combo = write_lines(&dir, "combo.txt", &["admin:pa:ss", "root:", ":nouser"]);

    let iterator = CredentialIterator::new(ssh_host(), "", "", &combo, "", false);
    assert_eq!(
        pairs(iterator),
        owned(&[("admin", "pa:ss"), ("root", ""), ("", "nouser")])
    );
}

// 测试组合模式优先于只有密码的模式
#[test]
fn test_combo_literal_emitted_once() {
    let mut iterator = CredentialIterator::new(ssh_host(), "x", "y", "admin:secret", "", true);
    match iterator.pull() {
        Pull::Credential(credential) => {
            assert_eq!(credential.username, "admin");
            assert_eq!(credential.password, "secret");
        }
        other => panic!("Expected credential, got {:?}", other),
    }
    assert!(matches!(iterator.pull(), Pull::Exhausted));
}

// 测试缺少冒号的组合字面量在第一次 pull 时报配置错误
#[test]
fn test_combo_literal_without_separator_fails() {
    let mut iterator = CredentialIterator::new(ssh_host(), "", "", "nocolon", "", false);
    assert!(matches!(
        iterator.pull(),
        Pull::Failed(CredError::ConfigError(_))
    ));
    assert!(matches!(iterator.pull(), Pull::Exhausted));
    assert!(iterator.close().is_ok());
}

// 测试不存在的路径按字面量处理
#[test]
fn test_missing_path_is_literal() {
    let iterator = CredentialIterator::new(
        ssh_host(),
        "/definitely/not/a/users.txt",
        "pw",
        "",
        "",
        false,
    );
    assert_eq!(
        pairs(iterator),
        owned(&[("/definitely/not/a/users.txt", "pw")])
    );
}

// 测试超长行导致迭代失败而不是截断
#[test]
fn test_line_too_long_fails() {
    let dir = TempDir::new().unwrap();
    let long = "x".repeat(64);
    let passwords = write_lines(&dir, "passwords.txt", &["short", &long, "after"]);

    let engine = EngineConfig::default().with_scanner(ScanLimits {
        buffer_size: 16,
        max_line_length: 32,
    });
    let config = IteratorConfig::new(ssh_host(), "root", &passwords, "", "", false)
        .with_engine(engine);
    let mut iterator = CredentialIterator::from_config(config);

    assert!(matches!(iterator.pull(), Pull::Credential(_)));
    assert!(matches!(
        iterator.pull(),
        Pull::Failed(CredError::LineTooLong(32))
    ));
    assert!(matches!(iterator.pull(), Pull::Exhausted));
}

// 测试构造时不做任何IO
#[test]
fn test_construct_is_lazy() {
    let dir = TempDir::new().unwrap();
    let passwords = write_lines(&dir, "passwords.txt", &["p1"]);
    let iterator = CredentialIterator::new(ssh_host(), "root", &passwords, "", "", false);

    // 构造之后删除文件，迭代器此时还没有打开任何东西
    std::fs::remove_file(&passwords).unwrap();
    assert!(!iterator.is_done());
    // 文件已不存在，按字面量处理
    assert_eq!(pairs(iterator), owned(&[("root", passwords.as_str())]));
}

// 测试 close 可以重复调用
#[test]
fn test_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let users = write_lines(&dir, "users.txt", &["u1", "u2"]);
    let passwords = write_lines(&dir, "passwords.txt", &["p1", "p2"]);

    let mut iterator = CredentialIterator::new(ssh_host(), &users, &passwords, "", "", false);
    assert!(matches!(iterator.pull(), Pull::Credential(_)));
    assert!(iterator.close().is_ok());
    assert!(iterator.close().is_ok());
    assert!(matches!(iterator.pull(), Pull::Exhausted));
}

fn chunking_engine(temp_root: &Path, chunk_size: u64) -> EngineConfig {
    EngineConfig::default().with_chunking(ChunkConfig {
        disabled: false,
        large_file_threshold: 1,
        chunk_size,
        temp_root: Some(temp_root.to_path_buf()),
    })
}

// 测试分块后的密码文件与未分块时结果一致，关闭后删除分块目录
#[test]
fn test_standard_with_chunked_passwords() {
    let dir = TempDir::new().unwrap();
    let chunk_root = TempDir::new().unwrap();
    let password_lines: Vec<String> = (0..500).map(|i| format!("pass{}", i)).collect();
    let password_refs: Vec<&str> = password_lines.iter().map(String::as_str).collect();
    let users = write_lines(&dir, "users.txt", &["u0", "u1", "u2"]);
    let passwords = write_lines(&dir, "passwords.txt", &password_refs);

    let config = IteratorConfig::new(ssh_host(), &users, &passwords, "", "", false)
        .with_engine(chunking_engine(chunk_root.path(), 256));
    let mut iterator = CredentialIterator::from_config(config);

    let mut emitted = Vec::new();
    while let Pull::Credential(credential) = iterator.pull() {
        emitted.push(credential);
    }
    assert_eq!(emitted.len(), 3 * 500);
    for (index, credential) in emitted.iter().enumerate() {
        assert_eq!(credential.username, format!("u{}", index / 500));
        assert_eq!(credential.password, format!("pass{}", index % 500));
    }

    // 用户名和密码文件都被分块
    assert_eq!(std::fs::read_dir(chunk_root.path()).unwrap().count(), 2);
    iterator.close().unwrap();
    assert_eq!(std::fs::read_dir(chunk_root.path()).unwrap().count(), 0);
}

// 测试分块的组合文件
#[test]
fn test_combo_with_chunked_file() {
    let dir = TempDir::new().unwrap();
    let chunk_root = TempDir::new().unwrap();
    let lines: Vec<String> = (0..200)
        .map(|i| {
            if i % 10 == 0 {
                format!("broken{}", i)
            } else {
                format!("user{}:pass{}", i, i)
            }
        })
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let combo = write_lines(&dir, "combo.txt", &refs);

    let config = IteratorConfig::new(ssh_host(), "", "", &combo, "", false)
        .with_engine(chunking_engine(chunk_root.path(), 128));
    let emitted = pairs(CredentialIterator::from_config(config));

    assert_eq!(emitted.len(), 180);
    assert_eq!(emitted[0], ("user1".to_string(), "pass1".to_string()));
    assert_eq!(emitted[179], ("user199".to_string(), "pass199".to_string()));
    // drop 时已经清理
    assert_eq!(std::fs::read_dir(chunk_root.path()).unwrap().count(), 0);
}

// 测试缓冲区为 0 时报配置错误，而不是当成空文件
#[test]
fn test_zero_buffer_size_is_config_error() {
    let dir = TempDir::new().unwrap();
    let passwords = write_lines(&dir, "passwords.txt", &["p1", "p2", "p3"]);
    let engine = EngineConfig::default().with_scanner(ScanLimits {
        buffer_size: 0,
        ..ScanLimits::default()
    });
    let config = IteratorConfig::new(ssh_host(), "root", &passwords, "", "", false)
        .with_engine(engine);

    let result = rust_cred_iterator::iterator::count_credentials(&config);
    assert!(matches!(result, Err(CredError::ConfigError(_))));

    let mut iterator = CredentialIterator::from_config(config);
    assert!(matches!(iterator.pull(), Pull::Failed(CredError::ConfigError(_))));
    assert!(matches!(iterator.pull(), Pull::Exhausted));
}

// 测试重置时第一个分块丢失：当前用户的密码照常输出，切换用户时报文件错误
#[test]
fn test_chunked_reset_fails_when_first_chunk_missing() {
    let dir = TempDir::new().unwrap();
    let chunk_root = TempDir::new().unwrap();
    let password_lines: Vec<String> = (0..200).map(|i| format!("pass{}", i)).collect();
    let password_refs: Vec<&str> = password_lines.iter().map(String::as_str).collect();
    let passwords = write_lines(&dir, "passwords.txt", &password_refs);

    let config = IteratorConfig::new(ssh_host(), "", &passwords, "", "", false)
        .with_engine(chunking_engine(chunk_root.path(), 128))
        .with_wordlists(Arc::new(StaticWordlists::new(["u1", "u2"], ["unused"])));
    let mut iterator = CredentialIterator::from_config(config);

    let mut emitted = Vec::new();
    match iterator.pull() {
        Pull::Credential(credential) => emitted.push(credential),
        other => panic!("unexpected first pull: {:?}", other),
    }

    // 只有密码文件被分块
    let chunk_dirs: Vec<_> = std::fs::read_dir(chunk_root.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(chunk_dirs.len(), 1);
    std::fs::remove_file(chunk_dirs[0].join("chunk_0000.txt")).unwrap();

    let terminal = loop {
        match iterator.pull() {
            Pull::Credential(credential) => emitted.push(credential),
            other => break other,
        }
    };

    assert_eq!(emitted.len(), 200);
    for (index, credential) in emitted.iter().enumerate() {
        assert_eq!(credential.username, "u1");
        assert_eq!(credential.password, format!("pass{}", index));
    }
    assert!(matches!(terminal, Pull::Failed(CredError::FileError { .. })));
    assert!(matches!(iterator.pull(), Pull::Exhausted));

    iterator.close().unwrap();
    assert_eq!(std::fs::read_dir(chunk_root.path()).unwrap().count(), 0);
}

// 测试未分块的密码文件在读取中被删除后，重置仍然通过已打开的句柄回到开头
#[test]
fn test_unchunked_reset_survives_deleted_file() {
    let dir = TempDir::new().unwrap();
    let passwords = write_lines(&dir, "passwords.txt", &["p1", "p2", "p3"]);
    let config = IteratorConfig::new(ssh_host(), "", &passwords, "", "", false)
        .with_wordlists(Arc::new(StaticWordlists::new(["u1", "u2"], ["unused"])));
    let mut iterator = CredentialIterator::from_config(config);

    let mut emitted = Vec::new();
    if let Pull::Credential(credential) = iterator.pull() {
        emitted.push((credential.username, credential.password));
    }
    std::fs::remove_file(&passwords).unwrap();
    emitted.extend(pairs(iterator));

    assert_eq!(
        emitted,
        owned(&[
            ("u1", "p1"),
            ("u1", "p2"),
            ("u1", "p3"),
            ("u2", "p1"),
            ("u2", "p2"),
            ("u2", "p3"),
        ])
    );
}
