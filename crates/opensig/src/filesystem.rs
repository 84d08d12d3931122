//! Decoding of local file system errors.

use std::io;
use std::path::Path;

use serde_json::json;

use crate::error::OpenSigError;

/// POSIX / libuv error codes and their descriptions.
const FS_ERROR_CODES: &[(&str, &str)] = &[
    ("E2BIG", "argument list too long"),
    ("EACCES", "permission denied"),
    ("EADDRINUSE", "address already in use"),
    ("EADDRNOTAVAIL", "address not available"),
    ("EAFNOSUPPORT", "address family not supported"),
    ("EAGAIN", "resource temporarily unavailable"),
    ("EAI_ADDRFAMILY", "address family not supported"),
    ("EAI_AGAIN", "temporary failure"),
    ("EAI_BADFLAGS", "bad ai_flags value"),
    ("EAI_BADHINTS", "invalid value for hints"),
    ("EAI_CANCELED", "request canceled"),
    ("EAI_FAIL", "permanent failure"),
    ("EAI_FAMILY", "ai_family not supported"),
    ("EAI_MEMORY", "out of memory"),
    ("EAI_NODATA", "no address"),
    ("EAI_NONAME", "unknown node or service"),
    ("EAI_OVERFLOW", "argument buffer overflow"),
    ("EAI_PROTOCOL", "resolved protocol is unknown"),
    ("EAI_SERVICE", "service not available for socket type"),
    ("EAI_SOCKTYPE", "socket type not supported"),
    ("EAI_SYSTEM", "system error"),
    ("EALREADY", "connection already in progress"),
    ("EBADF", "bad file descriptor"),
    ("EBUSY", "resource busy or locked"),
    ("ECANCELED", "operation canceled"),
    ("ECHARSET", "invalid Unicode character"),
    ("ECONNABORTED", "software caused connection abort"),
    ("ECONNREFUSED", "connection refused"),
    ("ECONNRESET", "connection reset by peer"),
    ("EDESTADDRREQ", "destination address required"),
    ("EEXIST", "file already exists"),
    ("EFAULT", "bad address in system call argument"),
    ("EFBIG", "file too large"),
    ("EHOSTUNREACH", "host is unreachable"),
    ("EINTR", "interrupted system call"),
    ("EINVAL", "invalid argument"),
    ("EIO", "i/o error"),
    ("EISCONN", "socket is already connected"),
    ("EISDIR", "illegal operation on a directory"),
    ("ELOOP", "too many symbolic links encountered"),
    ("EMFILE", "too many open files"),
    ("EMSGSIZE", "message too long"),
    ("ENAMETOOLONG", "name too long"),
    ("ENETDOWN", "network is down"),
    ("ENETUNREACH", "network is unreachable"),
    ("ENFILE", "file table overflow"),
    ("ENOBUFS", "no buffer space available"),
    ("ENODEV", "no such device"),
    ("ENOENT", "no such file or directory"),
    ("ENOMEM", "not enough memory"),
    ("ENONET", "machine is not on the network"),
    ("ENOPROTOOPT", "protocol not available"),
    ("ENOSPC", "no space left on device"),
    ("ENOSYS", "function not implemented"),
    ("ENOTCONN", "socket is not connected"),
    ("ENOTDIR", "not a directory"),
    ("ENOTEMPTY", "directory not empty"),
    ("ENOTSOCK", "socket operation on non-socket"),
    ("ENOTSUP", "operation not supported on socket"),
    ("EPERM", "operation not permitted"),
    ("EPIPE", "broken pipe"),
    ("EPROTO", "protocol error"),
    ("EPROTONOSUPPORT", "protocol not supported"),
    ("EPROTOTYPE", "protocol wrong type for socket"),
    ("ERANGE", "result too large"),
    ("EROFS", "read-only file system"),
    ("ESHUTDOWN", "cannot send after transport endpoint shutdown"),
    ("ESPIPE", "invalid seek"),
    ("ESRCH", "no such process"),
    ("ETIMEDOUT", "connection timed out"),
    ("ETXTBSY", "text file is busy"),
    ("EXDEV", "cross-device link not permitted"),
    ("UNKNOWN", "unknown error"),
    ("EOF", "end of file"),
    ("ENXIO", "no such device or address"),
    ("EMLINK", "too many links"),
];

/// Description for a code from the table.
pub fn describe(code: &str) -> Option<&'static str> {
    FS_ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

/// Errno values shared by Linux, the BSDs and macOS.
#[cfg(unix)]
fn code_from_errno(errno: i32) -> Option<&'static str> {
    Some(match errno {
        1 => "EPERM",
        2 => "ENOENT",
        3 => "ESRCH",
        4 => "EINTR",
        5 => "EIO",
        6 => "ENXIO",
        7 => "E2BIG",
        9 => "EBADF",
        12 => "ENOMEM",
        13 => "EACCES",
        14 => "EFAULT",
        16 => "EBUSY",
        17 => "EEXIST",
        18 => "EXDEV",
        19 => "ENODEV",
        20 => "ENOTDIR",
        21 => "EISDIR",
        22 => "EINVAL",
        23 => "ENFILE",
        24 => "EMFILE",
        26 => "ETXTBSY",
        27 => "EFBIG",
        28 => "ENOSPC",
        29 => "ESPIPE",
        30 => "EROFS",
        31 => "EMLINK",
        32 => "EPIPE",
        34 => "ERANGE",
        _ => return None,
    })
}

#[cfg(not(unix))]
fn code_from_errno(_errno: i32) -> Option<&'static str> {
    None
}

fn code_from_kind(kind: io::ErrorKind) -> Option<&'static str> {
    use io::ErrorKind::*;
    Some(match kind {
        NotFound => "ENOENT",
        PermissionDenied => "EACCES",
        AlreadyExists => "EEXIST",
        ConnectionRefused => "ECONNREFUSED",
        ConnectionReset => "ECONNRESET",
        ConnectionAborted => "ECONNABORTED",
        NotConnected => "ENOTCONN",
        AddrInUse => "EADDRINUSE",
        AddrNotAvailable => "EADDRNOTAVAIL",
        BrokenPipe => "EPIPE",
        WouldBlock => "EAGAIN",
        InvalidInput => "EINVAL",
        TimedOut => "ETIMEDOUT",
        Interrupted => "EINTR",
        Unsupported => "ENOTSUP",
        UnexpectedEof => "EOF",
        OutOfMemory => "ENOMEM",
        _ => return None,
    })
}

/// The table code for an I/O error, if it has one.
pub fn error_code(err: &io::Error) -> Option<&'static str> {
    err.raw_os_error()
        .and_then(code_from_errno)
        .or_else(|| code_from_kind(err.kind()))
}

/// Human message for an I/O error on `path`.
pub fn decode(err: &io::Error, path: &Path) -> String {
    match error_code(err).and_then(describe) {
        Some(description) => format!("{} {}", description, path.display()),
        None => format!("unknown error accessing {}", path.display()),
    }
}

/// A `FileSystemError` for an I/O error on `path`.
pub fn fs_error(err: &io::Error, path: &Path) -> OpenSigError {
    OpenSigError::FileSystem {
        message: decode(err, path),
        details: Some(json!({
            "code": error_code(err),
            "path": path.display().to_string(),
            "message": err.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_codes() {
        assert_eq!(describe("ENOENT"), Some("no such file or directory"));
        assert_eq!(describe("EISDIR"), Some("illegal operation on a directory"));
        assert_eq!(describe("ENOPE"), None);
    }

    #[test]
    fn test_decode_by_kind() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(
            decode(&err, Path::new("missing.txt")),
            "no such file or directory missing.txt"
        );

        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(decode(&err, Path::new("/root/x")), "permission denied /root/x");
    }

    #[test]
    fn test_decode_unknown() {
        let err = io::Error::new(io::ErrorKind::Other, "weird");
        assert_eq!(decode(&err, Path::new("f")), "unknown error accessing f");
    }

    #[cfg(unix)]
    #[test]
    fn test_decode_by_errno() {
        let err = io::Error::from_raw_os_error(21);
        assert_eq!(decode(&err, Path::new("dir")), "illegal operation on a directory dir");
    }

    #[test]
    fn test_fs_error_code() {
        let err = fs_error(&io::Error::new(io::ErrorKind::NotFound, "gone"), Path::new("a"));
        assert_eq!(err.code(), 300);
        assert_eq!(err.message(), "no such file or directory a");
        assert_eq!(err.details().unwrap()["code"], "ENOENT");
    }
}
