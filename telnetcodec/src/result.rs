//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while framing a telnet stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred on the underlying stream.
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// A subnegotiation payload could not be interpreted.
    SubnegotiationError {
        /// The option being subnegotiated
        option: u8,
        /// Bytes required by the option's payload format
        required: usize,
        /// Bytes actually received
        available: usize,
    },
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
            CodecError::SubnegotiationError {
                option,
                required,
                available,
            } => write!(
                f,
                "Subnegotiation error for option {}: required {} bytes, received {}",
                option, required, available
            ),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let err: CodecError =
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset").into();
        assert!(matches!(
            err,
            CodecError::IOError {
                kind: std::io::ErrorKind::ConnectionReset,
                ..
            }
        ));
        assert!(err.to_string().contains("peer reset"));
    }

    #[test]
    fn test_subnegotiation_display() {
        let err = CodecError::SubnegotiationError {
            option: 31,
            required: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Subnegotiation error for option 31: required 4 bytes, received 3"
        );
    }
}
